use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::Parser;
use cli::AppOptions;
use human_panic::setup_panic;
use laslite::diagnostics::LogSink;
use laslite::header::las_string;
use laslite::reader::{read_with, ReadOptions};
use log::{debug, error};
use serde_json::json;

mod cli;

fn main() -> ExitCode {
    setup_panic!();

    // arg parsing
    let args = AppOptions::parse();

    // logger
    simple_logger::init_with_level(args.log_level).unwrap();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            debug!("{e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &AppOptions) -> Result<()> {
    let options = ReadOptions {
        point_data_only: !args.full,
    };
    let Some(data) = read_with(&args.file, &options, &LogSink) else {
        bail!("could not read {}", args.file.display());
    };

    let header = &data.header;
    let coords = data.point_coords(!args.raw);
    let colors = data.point_colors();

    if args.json {
        let summary = json!({
            "version": format!("{}.{}", header.version_major, header.version_minor),
            "system_identifier": las_string(&header.system_identifier).unwrap_or_default(),
            "generating_software": las_string(&header.generating_software).unwrap_or_default(),
            "point_format": header.point_format(),
            "point_data_record_length": header.point_data_record_length,
            "num_points": data.num_points(),
            "scale": [header.scale.x, header.scale.y, header.scale.z],
            "offset": [header.offset.x, header.offset.y, header.offset.z],
            "min": [header.min.x, header.min.y, header.min.z],
            "max": [header.max.x, header.max.y, header.max.z],
            "variable_length_records": data.variable_length_records.len(),
            "extended_variable_length_records": data.extended_variable_length_records.len(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{}: LAS {}.{}, point format {}",
            args.file.display(),
            header.version_major,
            header.version_minor,
            header.point_data_record_format
        );
        println!("nPoints: {}", data.num_points());
        println!("coords.len(): {}", coords.len());
        println!("colors.len(): {}", colors.len());
        if let Some(first) = coords.chunks_exact(3).next() {
            println!("first point: ({}, {}, {})", first[0], first[1], first[2]);
        }
        if args.full {
            println!("VLRs: {}", data.variable_length_records.len());
            println!("EVLRs: {}", data.extended_variable_length_records.len());
        }
    }

    if args.validate {
        data.validate();
    }

    Ok(())
}
