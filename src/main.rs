//! Panelboard CLI
//!
//! Usage:
//!   panelboard table [FILE] [--mode tree|group] [--group-by FIELD]
//!                    [--filter TYPE] [--separators]
//!                    [--export-csv [PATH]] [--export-json [PATH]]
//!   panelboard check FILE
//!
//! `table` loads a CSV/JSON estimation file (or the built-in sample data)
//! and prints the projected table; `check` runs the violation scan over a
//! saved placement file.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{Attribute, Cell, Color, Table};

use panelboard::bom::{
    export, import, sample, BomTree, DisplayMode, FieldKind, GroupField, ItemType, LineItem,
    TableRow, TableView,
};
use panelboard::layout::{PanelLayout, Placement};
use panelboard::notify::{Notice, Severity};
use panelboard::settings::Settings;

#[derive(Parser)]
#[command(name = "panelboard")]
#[command(about = "Cost estimation and layout checks for electrical panel designs")]
struct Cli {
    /// Settings file (TOML)
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the estimation table from a CSV/JSON file (sample data if omitted)
    Table {
        /// Input file (.csv or .json)
        input: Option<PathBuf>,

        /// Presentation mode
        #[arg(long, value_enum, default_value_t = ModeArg::Tree)]
        mode: ModeArg,

        /// Group-mode bucketing field: type, voltage, or manufacturer
        #[arg(long)]
        group_by: Option<String>,

        /// Show only rows of this type (headers stay when a descendant matches)
        #[arg(long)]
        filter: Option<String>,

        /// Insert separator rows above headers before printing
        #[arg(long)]
        separators: bool,

        /// Export the tree as CSV
        #[arg(long, value_name = "PATH", num_args = 0..=1,
              default_missing_value = export::CSV_EXPORT_NAME)]
        export_csv: Option<PathBuf>,

        /// Export the tree as JSON
        #[arg(long, value_name = "PATH", num_args = 0..=1,
              default_missing_value = export::JSON_EXPORT_NAME)]
        export_json: Option<PathBuf>,
    },
    /// Scan a placement file for overlap and containment violations
    Check {
        /// Placement file (JSON with enclosures and components)
        input: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Tree,
    Group,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => match Settings::from_file(path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Error loading settings '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => Settings::default(),
    };

    match cli.command {
        Command::Table {
            input,
            mode,
            group_by,
            filter,
            separators,
            export_csv,
            export_json,
        } => run_table(
            &settings,
            input,
            mode,
            group_by,
            filter,
            separators,
            export_csv,
            export_json,
        ),
        Command::Check { input } => run_check(&settings, &input),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_table(
    settings: &Settings,
    input: Option<PathBuf>,
    mode: ModeArg,
    group_by: Option<String>,
    filter: Option<String>,
    separators: bool,
    export_csv: Option<PathBuf>,
    export_json: Option<PathBuf>,
) {
    let mut tree = match &input {
        Some(path) => match import::load_path(path) {
            Ok(imported) => {
                report(&Notice::success(format!(
                    "Loaded {} rows from {}",
                    imported.rows,
                    path.display()
                )));
                imported.tree
            }
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        },
        None => sample::panelboard_tree(),
    };

    if separators {
        let added = tree.add_separators();
        if added > 0 {
            report(&Notice::success(format!("Added {added} separator rows")));
        } else {
            report(&Notice::info("All headers already have separator rows"));
        }
    }

    let mut view = TableView::new();
    view.set_mode(match mode {
        ModeArg::Tree => DisplayMode::Tree,
        ModeArg::Group => DisplayMode::Group,
    });

    if let Some(field) = &group_by {
        match GroupField::parse(field) {
            Some(field) => view.set_group_by(field),
            None => {
                eprintln!("Error: unknown group field '{field}' (use type, voltage, or manufacturer)");
                process::exit(1);
            }
        }
    }

    if let Some(filter) = &filter {
        if !filter.eq_ignore_ascii_case("all") {
            match parse_type_strict(filter) {
                Some(kind) => view.set_type_filter(Some(kind)),
                None => {
                    eprintln!("Error: unknown component type '{filter}'");
                    process::exit(1);
                }
            }
        }
    }

    print_table(&tree, &view, &settings.table.currency);
    println!(
        "{} row(s) shown, {} in total",
        view.visible_item_count(&tree),
        tree.item_count()
    );

    if let Some(path) = export_csv {
        match export::write_csv(&tree, &path) {
            Ok(()) => report(&Notice::success(format!("CSV exported to {}", path.display()))),
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    }
    if let Some(path) = export_json {
        match export::write_json(&tree, &path) {
            Ok(()) => report(&Notice::success(format!(
                "JSON exported to {}",
                path.display()
            ))),
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    }
}

fn run_check(settings: &Settings, input: &PathBuf) {
    let text = match std::fs::read_to_string(input) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading '{}': {}", input.display(), e);
            process::exit(1);
        }
    };
    let placement: Placement = match serde_json::from_str(&text) {
        Ok(placement) => placement,
        Err(e) => {
            eprintln!("Error parsing '{}': {}", input.display(), e);
            process::exit(1);
        }
    };

    let layout = PanelLayout::from_placement(placement, settings.layout_config());

    let mut violations = 0usize;
    for component in layout.iter_components() {
        if component.outside_enclosure {
            violations += 1;
            println!(
                "outside: component \"{}\" ({}) is not inside any enclosure",
                component.name, component.id
            );
        }
        if component.overlapping {
            violations += 1;
            for marker in &component.intersections {
                println!(
                    "overlap: \"{}\" intersects \"{}\" around ({:.0}, {:.0})",
                    component.id, marker.other, marker.at.x, marker.at.y
                );
            }
        }
    }

    if violations == 0 {
        println!(
            "No violations across {} component(s) in {} enclosure(s)",
            layout.iter_components().count(),
            layout.iter_enclosures().count()
        );
    } else {
        println!("{violations} violation(s) found");
        process::exit(1);
    }
}

/// Strict type parsing for the --filter flag: unknown names are an error
/// here, not a silent fallback
fn parse_type_strict(value: &str) -> Option<ItemType> {
    ItemType::all()
        .into_iter()
        .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
}

fn print_table(tree: &BomTree, view: &TableView, currency: &str) {
    let fields = tree.fields();

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    table.set_header(fields.iter().map(String::as_str).collect::<Vec<_>>());

    for row in view.rows(tree) {
        match row {
            TableRow::Separator { .. } => {
                table.add_row(vec![Cell::new(""); fields.len()]);
            }
            TableRow::Item { item, depth } => {
                let cells: Vec<Cell> = fields
                    .iter()
                    .map(|field| item_cell(item, field, depth, currency))
                    .collect();
                table.add_row(cells);
            }
            TableRow::GroupHeader {
                key,
                rows,
                cost,
                total,
            } => {
                let cells: Vec<Cell> = fields
                    .iter()
                    .enumerate()
                    .map(|(index, field)| {
                        if index == 0 {
                            let label = if key.is_empty() { "(none)" } else { &key };
                            Cell::new(format!("{label} ({rows} rows)"))
                                .add_attribute(Attribute::Bold)
                                .fg(Color::Cyan)
                        } else {
                            match FieldKind::classify(field) {
                                FieldKind::Cost => Cell::new(format!("{currency}{cost:.2}"))
                                    .add_attribute(Attribute::Bold),
                                FieldKind::Total => Cell::new(format!("{currency}{total:.2}"))
                                    .add_attribute(Attribute::Bold),
                                _ => Cell::new(""),
                            }
                        }
                    })
                    .collect();
                table.add_row(cells);
            }
        }
    }

    println!("{table}");
}

fn item_cell(item: &LineItem, field: &str, depth: usize, currency: &str) -> Cell {
    let text = match field {
        "id" => item.id.clone(),
        "name" => format!("{}{}", "  ".repeat(depth), item.name),
        "type" => item.kind.to_string(),
        "voltage" => item.voltage.clone(),
        "manufacturer" => item.manufacturer.clone().unwrap_or_default(),
        "cost" => format!("{currency}{:.2}", item.cost),
        "quantity" => item.quantity.to_string(),
        "total" => format!("{currency}{:.2}", item.total),
        "ampRating" => item
            .amp_rating
            .map(|amps| format!("{amps} A"))
            .unwrap_or_default(),
        "rating" => item.rating.clone().unwrap_or_default(),
        other => item
            .extras
            .get(other)
            .map(|value| value.to_string())
            .unwrap_or_default(),
    };

    if item.is_header {
        Cell::new(text).add_attribute(Attribute::Bold)
    } else {
        Cell::new(text)
    }
}

fn report(notice: &Notice) {
    match notice.severity {
        Severity::Warning | Severity::Error => eprintln!("{notice}"),
        _ => println!("{notice}"),
    }
}
