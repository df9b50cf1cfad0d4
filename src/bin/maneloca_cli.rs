use maneloca::{
    about,
    config::ViewerConfig,
    export::{export_visible, ExportOutcome},
    loader::load_records,
    logging,
    prepare::merge_exon_intron,
    save::SaveTarget,
};
use maneloca_engine::{OpResult, Operation, ViewerEngine};
use maneloca_protocol::{resolve_route, BuildVersion, Column, Record};
use serde::Serialize;
use std::{
    collections::BTreeSet,
    env, fs,
    path::{Path, PathBuf},
};

#[derive(Serialize)]
struct LoadSummary {
    version: BuildVersion,
    source: String,
    record_count: usize,
    chromosome_count: usize,
}

#[derive(Serialize)]
struct ViewSummary<'a> {
    version: BuildVersion,
    visible_count: usize,
    current_page: usize,
    total_pages: usize,
    search: Option<String>,
    warnings: Vec<String>,
    rows: Vec<&'a Record>,
}

/// Writes to the path given on the command line.
struct OutputPath(PathBuf);

impl SaveTarget for OutputPath {
    fn choose_destination(&self, _suggested: &str) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

fn usage() {
    eprintln!(
        "Usage:\n  \
  maneloca_cli --version\n  \
  maneloca_cli [--config PATH] load VERSION\n  \
  maneloca_cli [--config PATH] view VERSION [FILTERS] [--page N]\n  \
  maneloca_cli [--config PATH] export VERSION OUTPUT.tsv [FILTERS]\n  \
  maneloca_cli [--config PATH] op VERSION '<operation-json>'...\n  \
  maneloca_cli merge-data EXON.bed INTRON.bed OUTPUT.bed\n  \
  maneloca_cli route PATH\n\n  \
  FILTERS: --filter COLUMN=TEXT  --exact COLUMN  --quick TEXT  --locate CHROM:POS\n  \
  Tip: pass @file.json instead of inline JSON"
    );
}

fn load_json_arg(value: &str) -> Result<String, String> {
    if let Some(path) = value.strip_prefix('@') {
        fs::read_to_string(path).map_err(|e| format!("Could not read JSON file '{path}': {e}"))
    } else {
        Ok(value.to_string())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Could not serialize JSON output: {e}"))?;
    println!("{text}");
    Ok(())
}

fn parse_global_config_arg(args: &[String]) -> (Option<String>, usize) {
    if args.len() >= 3 && args[1] == "--config" {
        return (Some(args[2].clone()), 3);
    }
    (None, 1)
}

fn parse_version(value: &str) -> Result<BuildVersion, String> {
    value.parse().map_err(|e| format!("{e}"))
}

fn parse_column(value: &str) -> Result<Column, String> {
    value.parse().map_err(|e| format!("{e}"))
}

/// Turns view flags into engine operations. A requested page is applied last
/// because every filter and search change restarts paging.
fn parse_view_ops(args: &[String]) -> Result<Vec<Operation>, String> {
    let mut ops = Vec::new();
    let mut page = None;
    let mut rest = args.iter();
    while let Some(flag) = rest.next() {
        let mut value = || {
            rest.next()
                .cloned()
                .ok_or_else(|| format!("Missing value for {flag}"))
        };
        match flag.as_str() {
            "--filter" => {
                let spec = value()?;
                let (column, needle) = spec
                    .split_once('=')
                    .ok_or_else(|| format!("Expected COLUMN=TEXT, got '{spec}'"))?;
                ops.push(Operation::SetColumnFilter {
                    column: parse_column(column)?,
                    needle: needle.to_string(),
                });
            }
            "--exact" => ops.push(Operation::SetExactMatch {
                column: parse_column(&value()?)?,
                exact: true,
            }),
            "--quick" => ops.push(Operation::SetQuickFilter { term: value()? }),
            "--locate" => ops.push(Operation::LocateQuery { query: value()? }),
            "--page" => {
                let raw = value()?;
                page = Some(
                    raw.parse::<usize>()
                        .map_err(|_| format!("Invalid page number '{raw}'"))?,
                );
            }
            other => return Err(format!("Unknown option '{other}'")),
        }
    }
    if let Some(page) = page {
        ops.push(Operation::SetPage { page });
    }
    Ok(ops)
}

fn load_engine(config: &ViewerConfig, version: BuildVersion) -> Result<ViewerEngine, String> {
    let records = load_records(&config.data_source(), version).map_err(|e| e.to_string())?;
    let mut engine = ViewerEngine::from_records(version, records);
    engine.set_no_match_policy(config.no_match_policy);
    Ok(engine)
}

fn apply_ops(engine: &mut ViewerEngine, ops: Vec<Operation>) -> Result<Vec<OpResult>, String> {
    engine.apply_all(ops).map_err(|e| e.to_string())
}

fn summarize_view(engine: &ViewerEngine, warnings: Vec<String>) -> ViewSummary<'_> {
    let page = engine.page_state();
    ViewSummary {
        version: engine.version().unwrap_or_default(),
        visible_count: engine.visible_len(),
        current_page: page.current_page,
        total_pages: page.total_pages,
        search: engine.search().query.as_ref().map(|q| q.to_string()),
        warnings,
        rows: engine.current_page_records(),
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        usage();
        return Err("Missing command".to_string());
    }
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{}", about::version_cli_text());
        return Ok(());
    }

    let (config_path, cmd_idx) = parse_global_config_arg(&args);
    if args.len() <= cmd_idx {
        usage();
        return Err("Missing command".to_string());
    }
    let config = ViewerConfig::load(config_path.as_deref()).map_err(|e| e.to_string())?;
    logging::init_tracing(&config.log_filter);

    let command = &args[cmd_idx];
    let params = &args[cmd_idx + 1..];

    match command.as_str() {
        "load" => {
            let Some(version) = params.first() else {
                usage();
                return Err("load requires: VERSION".to_string());
            };
            let version = parse_version(version)?;
            let source = config.data_source();
            let records = load_records(&source, version).map_err(|e| e.to_string())?;
            let chromosomes: BTreeSet<&str> = records.iter().map(|r| r.chrom.as_str()).collect();
            print_json(&LoadSummary {
                version,
                source: source.location(version),
                record_count: records.len(),
                chromosome_count: chromosomes.len(),
            })
        }
        "view" => {
            let Some(version) = params.first() else {
                usage();
                return Err("view requires: VERSION".to_string());
            };
            let version = parse_version(version)?;
            let ops = parse_view_ops(&params[1..])?;
            let mut engine = load_engine(&config, version)?;
            let warnings = apply_ops(&mut engine, ops)?
                .into_iter()
                .flat_map(|r| r.warnings)
                .collect();
            print_json(&summarize_view(&engine, warnings))
        }
        "export" => {
            if params.len() < 2 {
                usage();
                return Err("export requires: VERSION OUTPUT.tsv".to_string());
            }
            let version = parse_version(&params[0])?;
            let output = PathBuf::from(&params[1]);
            let ops = parse_view_ops(&params[2..])?;
            let mut engine = load_engine(&config, version)?;
            apply_ops(&mut engine, ops)?;
            let rows = engine.visible();
            match export_visible(&rows, version, &OutputPath(output)).map_err(|e| e.to_string())? {
                ExportOutcome::Saved(path) => {
                    println!("Wrote {} rows to '{}'", rows.len(), path.display());
                }
                ExportOutcome::Canceled => println!("Export canceled"),
            }
            Ok(())
        }
        "op" => {
            if params.len() < 2 {
                usage();
                return Err("op requires: VERSION '<operation-json>'".to_string());
            }
            let version = parse_version(&params[0])?;
            let ops = params[1..]
                .iter()
                .map(|raw| {
                    let json = load_json_arg(raw)?;
                    Operation::from_json(&json).map_err(|e| e.to_string())
                })
                .collect::<Result<Vec<_>, String>>()?;
            let mut engine = load_engine(&config, version)?;
            let results = apply_ops(&mut engine, ops)?;
            print_json(&results)
        }
        "merge-data" => {
            if params.len() < 3 {
                usage();
                return Err("merge-data requires: EXON.bed INTRON.bed OUTPUT.bed".to_string());
            }
            let report = merge_exon_intron(
                Path::new(&params[0]),
                Path::new(&params[1]),
                Path::new(&params[2]),
            )
            .map_err(|e| e.to_string())?;
            print_json(&report)
        }
        "route" => {
            let Some(path) = params.first() else {
                usage();
                return Err("route requires: PATH".to_string());
            };
            print_json(&resolve_route(path, config.default_version))
        }
        _ => {
            usage();
            Err(format!("Unknown command '{command}'"))
        }
    }
}
