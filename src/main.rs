/*
This file is part of the shapefile_reader library.
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT

Notes: Reports on the contents of a Shapefile and, optionally, its dBASE
attribute table.
*/
use anyhow::{Context, Result};
use clap::Parser;
use shapefile_reader::configs::{get_configs, ShapefileConfigs};
use shapefile_reader::structures::Point2D;
use shapefile_reader::utils::get_formatted_elapsed_time;
use shapefile_reader::vector::{AttributeTable, DbfTable, Shapefile};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "examine_shapefile")]
#[command(about = "Reports on the header, shapes and attribute table of a Shapefile")]
struct Args {
    /// The shape (.shp) file to open
    shape_file: PathBuf,

    /// The database (.dbf) file to open
    db_file: Option<PathBuf>,

    /// Directory holding a settings.json file of reader settings
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Lists the records whose shapes contain the point, given as X,Y
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    contains: Option<Point2D>,

    /// Print the shapefile header as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Log each record as it is read
    #[arg(short, long)]
    verbose: bool,
}

fn parse_point(s: &str) -> std::result::Result<Point2D, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected a point as X,Y but found '{}'", s))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x coordinate '{}': {}", x, e))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y coordinate '{}': {}", y, e))?;
    Ok(Point2D::new(x, y))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let configs = match &args.settings {
        Some(dir) => get_configs(dir)
            .with_context(|| format!("Failed to load settings from {}", dir.display()))?,
        None => ShapefileConfigs::new(),
    };
    debug!(?configs, "reader settings");

    let start = Instant::now();
    let sf = Shapefile::read(&args.shape_file, &configs)
        .with_context(|| format!("Failed to read shapefile {}", args.shape_file.display()))?;
    info!(
        "Read {} in {}",
        args.shape_file.display(),
        get_formatted_elapsed_time(start)
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(sf.header())?);
    } else {
        println!("\n\nShape file information");
        println!("======================");
        println!("Shape count =  {}", sf.shapes().len());
        println!("Parts =        {}", sf.get_total_num_parts());
        println!("Points =       {}", sf.get_total_num_points());
        println!("{}", sf.header());
    }

    let mut table = match &args.db_file {
        Some(db_file) => {
            let table = DbfTable::open(db_file)
                .with_context(|| format!("Failed to open database file {}", db_file.display()))?;
            print_table_report(&table);
            Some(table)
        }
        None => None,
    };

    if let Some(p) = args.contains {
        let start = Instant::now();
        let found = sf.find_containing(p.x, p.y);
        info!(
            "Found {} shapes containing {} in {}",
            found.len(),
            p,
            get_formatted_elapsed_time(start)
        );
        println!("\n\nShapes containing {}", p);
        println!("======================");
        for shape in found {
            match (table.as_mut(), shape.attribute_index()) {
                (Some(table), Some(index)) if index < table.num_records() => {
                    let bytes = table.record_bytes(index)?;
                    println!(
                        "{} -> attribute record {}: {}",
                        shape,
                        index,
                        String::from_utf8_lossy(bytes).trim_end()
                    );
                }
                (_, Some(index)) => println!("{} -> attribute record {}", shape, index),
                (_, None) => println!("{}", shape),
            }
        }
    }
    println!("\n");

    Ok(())
}

fn print_table_report<R: std::io::Read + std::io::Seek>(table: &DbfTable<R>) {
    println!("\n\nDatabase information");
    println!("====================");
    println!("DB version =   {}", table.version());
    println!("Num fields =   {}", table.fields().len());
    println!("Records =      {}", table.num_records());
    println!("Rec size =     {}", table.record_size());
    if let Some(date) = table.header.last_update {
        println!("Last update =  {}", date);
    }
    println!();
    println!(
        "{:>5}   {:<10} {:<7} {:<6}   {:>7}",
        "Field", "Name", "Type", "Length", "Decimal"
    );
    println!(
        "{:>5}   {:<10} {:<7} {:<6}   {:>7}",
        "-----", "----", "----", "------", "-------"
    );
    for (i, field) in table.fields().iter().enumerate() {
        println!(
            "{:>5}   {:<10} {:<7} {:>6}   {:>7}",
            i + 1,
            field.name,
            field.field_type.to_string(),
            field.field_length,
            field.decimal_count
        );
    }
}
