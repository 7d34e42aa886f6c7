//! Command-line editor for Office document metadata.
//!
//! On success the edited document is written as a copy next to the input,
//! `report.docx` becoming `report_copy.docx`; the input is never modified.
//!
//! ```sh
//! docmeta --creator '' sample.docx
//! docmeta --created 2024-12-09T13:09:23Z --manager 'Josh Kool' sample.xlsx
//! docmeta --show sample.pptx
//! ```

use chrono::{DateTime, Utc};
use clap::Parser;
use docmeta::property::datetime::{format_utc, parse_utc};
use docmeta::{Document, Error, Result};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Edit the metadata of Office documents (Office 2007 and later)
#[derive(Parser, Debug)]
#[command(
    name = "docmeta",
    version,
    long_about = "Edit the metadata of Office documents (Office 2007 and later).\n\
                  A copy of the document is written with the modifications.\n\
                  Pass an empty string to clear a property.\n\
                  Tested on .docx, .xlsx, .pptx, .vsdx and .accdt files."
)]
struct Args {
    /// The document path
    #[arg(value_name = "DOCPATH")]
    docpath: PathBuf,

    /// Who has created the document
    #[arg(long)]
    creator: Option<String>,

    /// Who has modified the document
    #[arg(long, alias = "last_modified_by")]
    last_modified_by: Option<String>,

    /// When the document has been created (YYYY-MM-DDThh:mm:ssZ)
    #[arg(long, value_parser = datetime_arg)]
    created: Option<Edit<DateTime<Utc>>>,

    /// When the document has been modified (YYYY-MM-DDThh:mm:ssZ)
    #[arg(long, value_parser = datetime_arg)]
    modified: Option<Edit<DateTime<Utc>>>,

    /// When the document has been printed (YYYY-MM-DDThh:mm:ssZ)
    #[arg(long, alias = "last_printed", value_parser = datetime_arg)]
    last_printed: Option<Edit<DateTime<Utc>>>,

    /// Manager's name
    #[arg(long)]
    manager: Option<String>,

    /// Company's name
    #[arg(long)]
    company: Option<String>,

    /// Output path, defaults to `<name>_copy.<ext>` beside the input
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Print the document's properties; without edits nothing is written
    #[arg(long)]
    show: bool,
}

impl Args {
    fn has_edits(&self) -> bool {
        self.creator.is_some()
            || self.last_modified_by.is_some()
            || self.created.is_some()
            || self.modified.is_some()
            || self.last_printed.is_some()
            || self.manager.is_some()
            || self.company.is_some()
    }
}

/// A new value for a property, `None` when it is to be cleared.
#[derive(Debug, Clone)]
struct Edit<T>(Option<T>);

fn datetime_arg(text: &str) -> std::result::Result<Edit<DateTime<Utc>>, String> {
    if text.is_empty() {
        return Ok(Edit(None));
    }
    parse_utc(text)
        .map(|dt| Edit(Some(dt)))
        .map_err(|e| format!("{e}, expected YYYY-MM-DDThh:mm:ssZ"))
}

/// Empty strings clear a text property.
fn text_arg(value: &str) -> Option<&str> {
    Some(value).filter(|v| !v.is_empty())
}

/// `dir/report.docx` becomes `dir/report_copy.docx`.
fn copy_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{stem}_copy.{}", ext.to_string_lossy()),
        None => format!("{stem}_copy"),
    };
    input.with_file_name(name)
}

fn show(doc: &Document) {
    let core = doc.core();
    let datetime = |dt: Option<DateTime<Utc>>| dt.as_ref().map(format_utc);

    println!("title:            {}", core.title().unwrap_or_default());
    println!("subject:          {}", core.subject().unwrap_or_default());
    println!("creator:          {}", core.creator().unwrap_or_default());
    println!("keywords:         {}", core.keywords().unwrap_or_default());
    println!("description:      {}", core.description().unwrap_or_default());
    println!("last_modified_by: {}", core.last_modified_by().unwrap_or_default());
    println!("category:         {}", core.category().unwrap_or_default());
    println!(
        "revision:         {}",
        core.revision_number().map(|r| r.to_string()).unwrap_or_default()
    );
    println!("created:          {}", datetime(core.created()).unwrap_or_default());
    println!("modified:         {}", datetime(core.modified()).unwrap_or_default());
    println!("last_printed:     {}", datetime(core.last_printed()).unwrap_or_default());

    match doc.app() {
        Ok(app) => {
            println!("template:         {}", app.template().unwrap_or_default());
            println!(
                "total_time:       {}",
                app.total_time().map(|t| t.to_string()).unwrap_or_default()
            );
            println!("application:      {}", app.application().unwrap_or_default());
            println!("manager:          {}", app.manager().unwrap_or_default());
            println!("company:          {}", app.company().unwrap_or_default());
            println!("app_version:      {}", app.app_version().unwrap_or_default());
        },
        Err(_) => println!("(no app.xml)"),
    }
}

fn run(args: Args) -> Result<()> {
    if !args.docpath.is_file() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("file not found at '{}'", args.docpath.display()),
        )));
    }

    let mut doc = Document::open(args.docpath.as_path())?;
    if args.show {
        show(&doc);
        if !args.has_edits() {
            return Ok(());
        }
    }

    let core = doc.core_mut();
    if let Some(creator) = &args.creator {
        core.set_creator(text_arg(creator));
    }
    if let Some(last_modified_by) = &args.last_modified_by {
        core.set_last_modified_by(text_arg(last_modified_by));
    }
    if let Some(Edit(created)) = args.created {
        core.set_created(created);
    }
    if let Some(Edit(modified)) = args.modified {
        core.set_modified(modified);
    }
    if let Some(Edit(last_printed)) = args.last_printed {
        core.set_last_printed(last_printed);
    }

    if args.manager.is_some() || args.company.is_some() {
        let app = doc.app_mut()?;
        if let Some(manager) = &args.manager {
            app.set_manager(text_arg(manager));
        }
        if let Some(company) = &args.company {
            app.set_company(text_arg(company));
        }
    }

    let output = args.output.clone().unwrap_or_else(|| copy_path(&args.docpath));
    debug!(input = %args.docpath.display(), output = %output.display(), "writing copy");
    doc.save(&output)?;
    info!(output = %output.display(), "document saved");
    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Err: {e}");
            ExitCode::FAILURE
        },
    }
}
