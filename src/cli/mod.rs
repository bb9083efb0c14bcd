//! Non-interactive CLI mode for scripting and piped input.

use crate::{Args, ColorChoice, Format};
use crossterm::style::{Attribute, Color, ContentStyle, Stylize};
use querypad::app::QueryResult;
use querypad::db;
use querypad::highlight::{self, Catalog, Category, CommentPolicy};
use querypad::output;
use std::io::{self, BufRead, IsTerminal, Read, Write};

/// Run querypad in CLI mode.
pub async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    // Determine SQL source
    let sql = if let Some(ref input_file) = args.input {
        std::fs::read_to_string(input_file)?
    } else if !io::stdin().is_terminal() {
        // Read from stdin pipe
        let mut buf = String::new();
        io::stdin().lock().read_to_string(&mut buf)?;
        buf
    } else {
        // Interactive CLI mode: read line by line
        return run_interactive(&args).await;
    };

    if args.highlight_only {
        let mut stdout = io::stdout().lock();
        write_highlighted(&mut stdout, &sql, args.comment_policy.into(), use_color(&args))?;
        return Ok(());
    }

    execute_and_print(&sql, &args).await?;
    Ok(())
}

/// Run interactive CLI (line-by-line REPL).
async fn run_interactive(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let color = use_color(args);

    loop {
        print!("querypad> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            break;
        }

        write_highlighted(&mut stdout, trimmed, args.comment_policy.into(), color)?;
        if !args.highlight_only
            && let Err(e) = execute_and_print(trimmed, args).await
        {
            tracing::warn!(error = %e, "query failed");
        }
    }

    Ok(())
}

/// Execute a SQL statement and print results.
async fn execute_and_print(sql: &str, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    if sql.trim().is_empty() {
        return Err(querypad::Error::EmptyQuery.into());
    }
    let result = db::query::execute_query(sql).await;
    let rows = db::query::filter_rows(&result, args.filter.as_deref().unwrap_or(""));

    let out: Box<dyn Write> = if let Some(ref path) = args.output {
        Box::new(std::fs::File::create(path)?)
    } else {
        Box::new(io::stdout())
    };
    let mut writer = io::BufWriter::new(out);

    print_result(&mut writer, &result, &rows, args.format)?;
    writer.flush()?;
    Ok(())
}

fn print_result(
    writer: &mut dyn Write,
    result: &QueryResult,
    rows: &[usize],
    format: Format,
) -> querypad::Result<()> {
    match format {
        Format::Csv => output::write_csv(writer, result, rows),
        Format::Json => output::write_json(writer, result, rows),
        Format::Table => output::write_table(writer, result, rows),
    }
}

fn use_color(args: &Args) -> bool {
    match args.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => io::stdout().is_terminal(),
    }
}

/// Terminal style for a highlight category.
fn category_style(category: Category) -> ContentStyle {
    let style = ContentStyle::new();
    match category {
        Category::Comment => style.with(Color::DarkGrey).attribute(Attribute::Italic),
        Category::String => style.with(Color::Blue),
        Category::Number => style.with(Color::Green),
        Category::QueryKeyword => style.with(Color::Blue).attribute(Attribute::Bold),
        Category::ModificationKeyword => style.with(Color::Green).attribute(Attribute::Bold),
        Category::DefinitionKeyword => style.with(Color::Magenta).attribute(Attribute::Bold),
        Category::OperatorKeyword => style.with(Color::Yellow).attribute(Attribute::Bold),
        Category::TransactionKeyword => style.with(Color::Red).attribute(Attribute::Bold),
        Category::Plain => style,
    }
}

/// Print `sql` with a line-number gutter, optionally colored.
pub fn write_highlighted(
    writer: &mut dyn Write,
    sql: &str,
    policy: CommentPolicy,
    color: bool,
) -> io::Result<()> {
    let lines = highlight::highlight_with(sql, Catalog::standard(), policy);
    let width = lines.len().to_string().len();
    for line in &lines {
        write!(writer, "{:>width$} │ ", line.number, width = width)?;
        for (category, text) in &line.segments {
            if color && *category != Category::Plain {
                write!(writer, "{}", category_style(*category).apply(*text))?;
            } else {
                write!(writer, "{}", text)?;
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}
