use clap::{Parser as ClapParser, Subcommand};
use odata_sql::RenderedSql;
use odata_sql::cli::{
    self, CheckOptions, CheckResult, CliError, CompileOptions, Target, rendered_to_json,
};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "odata-sql")]
#[command(about = "odata-sql - Compile OData $filter and $orderby expressions into SQL")]
#[command(version)]
struct Cli {
    /// Log compiler decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a $filter expression into a WHERE predicate
    Filter {
        /// The $filter expression
        expr: String,

        #[command(flatten)]
        common: CompileArgs,
    },

    /// Compile an $orderby expression into an ORDER BY clause
    Orderby {
        /// The $orderby expression
        expr: String,

        /// Tie-breaking column (table.column) appended after all clauses
        #[arg(short, long)]
        stable: Option<String>,

        #[command(flatten)]
        common: CompileArgs,
    },

    /// Only validate $filter syntax
    Check {
        /// The $filter expression
        expr: String,

        /// Longest accepted expression, in characters
        #[arg(long, default_value_t = 4096)]
        max_length: usize,
    },
}

#[derive(clap::Args)]
struct CompileArgs {
    /// Field map as a JSON file path or inline JSON (reads from stdin if not provided)
    #[arg(short, long)]
    fields: Option<String>,

    /// Print {"sql": ..., "params": [...]} instead of plain text
    #[arg(long)]
    json: bool,

    /// Longest accepted expression, in characters
    #[arg(long, default_value_t = 4096)]
    max_length: usize,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Filter { expr, common } => run_compile(expr, Target::Filter, common),
        Commands::Orderby {
            expr,
            stable,
            common,
        } => run_compile(expr, Target::OrderBy { stable }, common),
        Commands::Check { expr, max_length } => {
            cli::execute_check(&CheckOptions { expr, max_length }).map(|result| match result {
                CheckResult::SyntaxValid(canonical) => println!("Syntax is valid: {}", canonical),
            })
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("odata_sql=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_compile(expr: String, target: Target, args: CompileArgs) -> Result<(), CliError> {
    let source = match args.fields {
        Some(s) => s,
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        None => return Err(CliError::NoFieldMap),
    };

    let options = CompileOptions {
        expr,
        field_map: cli::load_field_map(&source)?,
        target,
        max_length: args.max_length,
    };

    let rendered = cli::execute_compile(&options)?;
    if args.json {
        println!("{}", rendered_to_json(&rendered));
    } else {
        print_plain(&rendered);
    }
    Ok(())
}

fn print_plain(rendered: &RenderedSql) {
    println!("{}", rendered.sql);
    for (i, param) in rendered.params.iter().enumerate() {
        println!("  ${} = {}", i + 1, param.to_json());
    }
}
