//! shiftcheck command line front end
//!
//! Terminal interface over the checklist core and store:
//! - `grid`: render the checklist layout
//! - `submit`: build a session from flags and record today's snapshot
//! - `history`: print the stored log
//! - `export`: write the log's CSV encoding to a file or stdout
//! - `clear`: delete the history log
//!
//! All subcommands sit behind the shared-secret gate: the supplied
//! password must match the configured one before the store is touched.

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::Local;
use clap::{value_parser, Arg, ArgAction, Command};
use shiftcheck_core::{AppConfig, CellKey, GridConfig, Session, TriState};
use shiftcheck_store::{CsvStore, HistoryLog};
use unicode_width::UnicodeWidthStr;

fn build_cli() -> Command {
    Command::new("shiftcheck")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Daily pre-work equipment checklist")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to a TOML config file (grid, history path, password)"),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .global(true)
                .help("Shared access secret (or set SHIFTCHECK_PASSWORD)"),
        )
        .subcommand(Command::new("grid").about("Render the checklist layout"))
        .subcommand(
            Command::new("submit")
                .about("Record today's snapshot, overwriting any earlier one from today")
                .arg(
                    Arg::new("staff-id")
                        .long("staff-id")
                        .required(true)
                        .help("Staff identifier recorded on every row"),
                )
                .arg(
                    Arg::new("set")
                        .long("set")
                        .action(ArgAction::Append)
                        .value_name("SECTION/ITEM/MACHINE=ok|ng|blank")
                        .help("Set a cell to an explicit state"),
                )
                .arg(
                    Arg::new("toggle")
                        .long("toggle")
                        .action(ArgAction::Append)
                        .value_name("SECTION/ITEM/MACHINE")
                        .help("Advance a cell one step (blank -> OK -> NG -> blank)"),
                )
                .arg(
                    Arg::new("comment")
                        .long("comment")
                        .action(ArgAction::Append)
                        .value_name("SECTION=TEXT")
                        .help("Attach a free-text comment to a section"),
                ),
        )
        .subcommand(
            Command::new("history")
                .about("Print the stored history log")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Emit rows as JSON instead of a table"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write the log's CSV encoding")
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Output path (stdout when omitted)"),
                ),
        )
        .subcommand(Command::new("clear").about("Delete the history log"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let matches = build_cli().get_matches();

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            let config = AppConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?;
            tracing::debug!(config = %path.display(), "loaded site config");
            config
        }
        None => AppConfig::default(),
    };

    // Shared-secret gate, checked before any store access.
    let supplied = resolve_secret(
        matches.get_one::<String>("password").map(String::as_str),
        std::env::var("SHIFTCHECK_PASSWORD").ok(),
    );
    enforce_gate(&config, &supplied)?;

    let store = CsvStore::new(&config.history_path);

    match matches.subcommand() {
        Some(("grid", _)) => {
            print_grid(&config.grid);
            Ok(())
        }
        Some(("submit", sub)) => cmd_submit(&config, &store, sub),
        Some(("history", sub)) => cmd_history(&store, sub.get_flag("json")),
        Some(("export", sub)) => cmd_export(&store, sub.get_one::<PathBuf>("out")),
        Some(("clear", _)) => {
            store.clear()?;
            println!("history log deleted");
            Ok(())
        }
        _ => unreachable!("subcommand is required"),
    }
}

fn cmd_submit(
    config: &AppConfig,
    store: &CsvStore,
    matches: &clap::ArgMatches,
) -> anyhow::Result<()> {
    let staff_id = matches.get_one::<String>("staff-id").unwrap();

    let mut session = Session::new();
    if let Some(specs) = matches.get_many::<String>("set") {
        for spec in specs {
            let (key, state) = parse_set(spec)?;
            require_cell(&config.grid, &key)?;
            session.set(key, state);
        }
    }
    if let Some(specs) = matches.get_many::<String>("toggle") {
        for spec in specs {
            let key = parse_cell(spec)?;
            require_cell(&config.grid, &key)?;
            session.toggle(&key);
        }
    }
    if let Some(specs) = matches.get_many::<String>("comment") {
        for spec in specs {
            let (section, text) = parse_comment(spec)?;
            if !config.grid.comment_sections().any(|s| s == section) {
                bail!("section {section:?} does not take a comment");
            }
            session.set_comment(section, text);
        }
    }

    let now = Local::now().naive_local();
    let mut log = store.load();
    store.submit(&mut log, &config.grid, &session, staff_id, now)?;
    tracing::info!(
        staff_id = %staff_id,
        marked = session.marked_count(),
        "submission accepted"
    );
    println!(
        "recorded {} rows; any earlier submission from today was overwritten",
        config.grid.total_cells()
    );
    Ok(())
}

fn cmd_history(store: &CsvStore, as_json: bool) -> anyhow::Result<()> {
    let log = store.load();
    if log.is_empty() {
        println!("history log is empty");
        return Ok(());
    }
    if as_json {
        println!("{}", serde_json::to_string_pretty(log.rows())?);
    } else {
        print_history_table(&log);
    }
    Ok(())
}

fn cmd_export(store: &CsvStore, out: Option<&PathBuf>) -> anyhow::Result<()> {
    let log = store.load();
    let bytes = log.to_csv_bytes()?;
    match out {
        Some(path) => {
            std::fs::write(path, &bytes)
                .with_context(|| format!("writing export to {}", path.display()))?;
            tracing::info!(rows = log.len(), out = %path.display(), "exported history log");
            println!("exported {} rows to {}", log.len(), path.display());
        }
        None => std::io::stdout().write_all(&bytes)?,
    }
    Ok(())
}

fn print_grid(grid: &GridConfig) {
    println!("machines: {}", grid.machines.join(", "));
    for section in &grid.sections {
        println!("[{}]", section.name);
        for item in &section.items {
            if *item == grid.comment_item {
                println!("  {item} (takes a section comment)");
            } else {
                println!("  {item}");
            }
        }
    }
}

fn print_history_table(log: &HistoryLog) {
    print!("{}", format_history_table(log));
}

/// Display widths of the table columns preceding the comment.
const COLUMN_WIDTHS: [usize; 6] = [19, 10, 12, 12, 8, 5];

fn format_history_table(log: &HistoryLog) -> String {
    let mut out = String::new();
    push_table_line(
        &mut out,
        ["timestamp", "staff", "section", "item", "machine", "state"],
        "comment",
    );
    for row in log.rows() {
        push_table_line(
            &mut out,
            [
                row.timestamp.as_str(),
                row.staff_id.as_str(),
                row.section.as_str(),
                row.item.as_str(),
                row.machine.as_str(),
                row.state.as_wire(),
            ],
            &row.comment,
        );
    }
    out
}

fn push_table_line(out: &mut String, cells: [&str; 6], comment: &str) {
    for (cell, width) in cells.iter().zip(COLUMN_WIDTHS) {
        out.push_str(&pad_display(cell, width));
        out.push_str("  ");
    }
    out.push_str(comment);
    out.push('\n');
}

/// Pad to a terminal display width. Unlike `{:<width$}`, this counts
/// double-width CJK characters as two columns, so the default
/// deployment's section and item names stay aligned.
fn pad_display(s: &str, width: usize) -> String {
    let mut out = String::from(s);
    let current = UnicodeWidthStr::width(s);
    for _ in current..width {
        out.push(' ');
    }
    out
}

/// Resolve the supplied secret: the `--password` flag wins, then the
/// `SHIFTCHECK_PASSWORD` environment variable, then empty.
fn resolve_secret(flag: Option<&str>, env: Option<String>) -> String {
    match flag {
        Some(value) => value.to_string(),
        None => env.unwrap_or_default(),
    }
}

/// Shared-secret gate. Called before the store is constructed, so a
/// mismatch never touches the history log.
fn enforce_gate(config: &AppConfig, supplied: &str) -> anyhow::Result<()> {
    if config.secret_matches(supplied) {
        return Ok(());
    }
    tracing::warn!("access denied: supplied secret does not match");
    bail!("access denied: password does not match");
}

/// Parse `SECTION/ITEM/MACHINE` into a cell key.
fn parse_cell(spec: &str) -> anyhow::Result<CellKey> {
    let mut parts = spec.splitn(3, '/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(section), Some(item), Some(machine))
            if !section.is_empty() && !item.is_empty() && !machine.is_empty() =>
        {
            Ok(CellKey::new(section, item, machine))
        }
        _ => bail!("expected SECTION/ITEM/MACHINE, got {spec:?}"),
    }
}

/// Parse `SECTION/ITEM/MACHINE=ok|ng|blank`.
fn parse_set(spec: &str) -> anyhow::Result<(CellKey, TriState)> {
    let Some((cell, state)) = spec.rsplit_once('=') else {
        bail!("expected SECTION/ITEM/MACHINE=STATE, got {spec:?}");
    };
    let state = match state.to_ascii_lowercase().as_str() {
        "ok" => TriState::Ok,
        "ng" => TriState::Ng,
        "blank" => TriState::Blank,
        other => bail!("unknown state {other:?}; expected ok, ng, or blank"),
    };
    Ok((parse_cell(cell)?, state))
}

/// Parse `SECTION=TEXT`.
fn parse_comment(spec: &str) -> anyhow::Result<(String, String)> {
    match spec.split_once('=') {
        Some((section, text)) if !section.is_empty() => {
            Ok((section.to_string(), text.to_string()))
        }
        _ => bail!("expected SECTION=TEXT, got {spec:?}"),
    }
}

fn require_cell(grid: &GridConfig, key: &CellKey) -> anyhow::Result<()> {
    if grid.all_triples().any(|k| k == *key) {
        return Ok(());
    }
    bail!("cell {key} is not part of the checklist grid");
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiftcheck_test_utils::fixture_grid;

    #[test]
    fn parse_cell_accepts_three_parts() {
        let key = parse_cell("Bench/Pencil/M1").unwrap();
        assert_eq!(key, CellKey::new("Bench", "Pencil", "M1"));
    }

    #[test]
    fn parse_cell_rejects_short_specs() {
        assert!(parse_cell("Bench/Pencil").is_err());
        assert!(parse_cell("Bench//M1").is_err());
        assert!(parse_cell("").is_err());
    }

    #[test]
    fn parse_set_maps_state_tokens() {
        let (key, state) = parse_set("Bench/Pencil/M1=ng").unwrap();
        assert_eq!(key, CellKey::new("Bench", "Pencil", "M1"));
        assert_eq!(state, TriState::Ng);

        let (_, state) = parse_set("Bench/Pencil/M1=OK").unwrap();
        assert_eq!(state, TriState::Ok);

        let (_, state) = parse_set("Bench/Pencil/M1=blank").unwrap();
        assert_eq!(state, TriState::Blank);
    }

    #[test]
    fn parse_set_rejects_unknown_states() {
        assert!(parse_set("Bench/Pencil/M1=maybe").is_err());
        assert!(parse_set("Bench/Pencil/M1").is_err());
    }

    #[test]
    fn parse_comment_splits_on_first_equals() {
        let (section, text) = parse_comment("Bench=loose bolt on M3=M4 rail").unwrap();
        assert_eq!(section, "Bench");
        assert_eq!(text, "loose bolt on M3=M4 rail");
    }

    #[test]
    fn require_cell_checks_grid_membership() {
        let grid = fixture_grid();
        assert!(require_cell(&grid, &CellKey::new("Bench", "Pencil", "M1")).is_ok());
        assert!(require_cell(&grid, &CellKey::new("Bench", "Pencil", "M11")).is_err());
        assert!(require_cell(&grid, &CellKey::new("Paint", "Pencil", "M1")).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn resolve_secret_prefers_flag_over_env() {
        assert_eq!(
            resolve_secret(Some("from-flag"), Some("from-env".to_string())),
            "from-flag"
        );
        assert_eq!(resolve_secret(None, Some("from-env".to_string())), "from-env");
        assert_eq!(resolve_secret(None, None), "");
    }

    #[test]
    fn gate_denies_mismatched_secret() {
        let config = AppConfig::default();
        assert!(enforce_gate(&config, "2226").is_ok());

        let err = enforce_gate(&config, "2227").unwrap_err();
        assert!(err.to_string().contains("access denied"));
        assert!(enforce_gate(&config, "").is_err());
    }

    #[test]
    fn pad_display_counts_cjk_as_double_width() {
        assert_eq!(UnicodeWidthStr::width(pad_display("作業台", 12).as_str()), 12);
        assert_eq!(UnicodeWidthStr::width(pad_display("Bench", 12).as_str()), 12);
        // Overlong content is left as-is rather than truncated.
        assert_eq!(pad_display("0123456789ABCDEF", 12), "0123456789ABCDEF");
    }

    fn table_row(
        section: &str,
        item: &str,
        machine: &str,
        state: TriState,
        comment: &str,
    ) -> shiftcheck_store::SubmissionRow {
        shiftcheck_store::SubmissionRow {
            timestamp: "2024-01-01 09:00:00".to_string(),
            staff_id: "S1".to_string(),
            section: section.to_string(),
            item: item.to_string(),
            machine: machine.to_string(),
            state,
            comment: comment.to_string(),
        }
    }

    #[test]
    fn history_table_aligns_cjk_and_ascii_rows() {
        let log = HistoryLog::from_rows(vec![
            table_row("作業台", "シャーペン", "1号機", TriState::Ng, "棚の整理"),
            table_row("Bench", "Pencil", "M1", TriState::Ok, "all clear"),
        ]);
        let table = format_history_table(&log);

        // The comment column starts at the same display offset on every
        // line, CJK names included.
        let expected: usize = COLUMN_WIDTHS.iter().sum::<usize>() + 2 * COLUMN_WIDTHS.len();
        for (line, comment) in table.lines().zip(["comment", "棚の整理", "all clear"]) {
            assert!(line.ends_with(comment), "line {line:?} missing {comment:?}");
            let prefix = &line[..line.len() - comment.len()];
            assert_eq!(
                UnicodeWidthStr::width(prefix),
                expected,
                "misaligned line: {line:?}"
            );
        }
    }
}
