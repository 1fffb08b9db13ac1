use georef_pairing::config::replay::{self, ReplayConfig, ScriptStep};
use georef_pairing::diagnostics::SessionReport;
use georef_pairing::io::{read_json_file, write_bytes_file, write_json_file};
use georef_pairing::service::HttpClient;
use georef_pairing::{DatasetSide, Error, GeorefSession, PlacementOutcome, Result};
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = replay::load_config(Path::new(&config_path))?;

    let mut session = GeorefSession::new(
        config.params.clone(),
        config.viewport.width,
        config.viewport.height,
    );
    load_side(&mut session, &config, DatasetSide::Raw)?;
    load_side(&mut session, &config, DatasetSide::Ref)?;

    for (i, step) in config.script.iter().enumerate() {
        replay_step(&mut session, i, step);
    }

    let report = session.report();
    print_text_summary(&report);

    if let Some(path) = &config.output.json_out {
        write_json_file(path, &report)?;
        println!("\nJSON report written to {}", path.display());
    }

    if let Some(service) = &config.service {
        session.set_session_id(service.session_id.clone());
        let client = HttpClient::new(service.base_url.clone())?;
        match session.submit(&client) {
            Ok(archive) => {
                write_bytes_file(&service.archive_out, &archive.bytes)?;
                println!(
                    "\nTransform archive {} ({} bytes) written to {}",
                    archive.filename,
                    archive.bytes.len(),
                    service.archive_out.display()
                );
            }
            Err(e) if e.is_recoverable() => {
                println!("\nSubmission failed: {e}");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

fn load_side(session: &mut GeorefSession, config: &ReplayConfig, side: DatasetSide) -> Result<()> {
    let input = match side {
        DatasetSide::Raw => &config.raw,
        DatasetSide::Ref => &config.ref_,
    };
    let geojson = read_json_file(&input.geojson)?;
    session.load_geojson(
        side,
        geojson,
        input.key_column.clone(),
        input.bounds.as_ref().map(|b| &b[..]),
    );
    Ok(())
}

fn replay_step(session: &mut GeorefSession, i: usize, step: &ScriptStep) {
    match step {
        ScriptStep::Click { side, x, y } => match session.click(*side, [*x, *y]) {
            Some(PlacementOutcome::Pending(_)) => {
                let coord = session.pending().get(*side);
                println!("[{i}] {side} click ({x}, {y}) -> pending {coord:?}");
            }
            Some(PlacementOutcome::Committed(pair)) => println!(
                "[{i}] {side} click ({x}, {y}) -> pair #{} raw={:?} ref={:?} {}",
                pair.id,
                pair.raw,
                pair.ref_,
                pair.color.to_css()
            ),
            Some(PlacementOutcome::Duplicate) => {
                println!("[{i}] {side} click ({x}, {y}) -> duplicate pair ignored")
            }
            None => println!("[{i}] {side} click ({x}, {y}) -> placement disabled"),
        },
        ScriptStep::Remove { id } => match session.remove_pair(*id) {
            Some(_) => println!("[{i}] removed pair #{id}"),
            None => println!("[{i}] no pair #{id} to remove"),
        },
        ScriptStep::Reset => {
            session.reset();
            println!("[{i}] reset");
        }
    }
}

fn print_text_summary(report: &SessionReport) {
    println!("\nControl pairs ({})", report.pair_count);
    for row in &report.pairs {
        println!(
            "  {:>3}. #{:<3} {} raw=[{:.3}, {:.3}] ref=[{:.6}, {:.6}]",
            row.index, row.id, row.color_hex, row.raw[0], row.raw[1], row.ref_[0], row.ref_[1]
        );
    }
    println!(
        "Pending: raw={} ref={}",
        format_opt(report.pending.raw),
        format_opt(report.pending.ref_)
    );
    for s in [&report.raw, &report.ref_] {
        println!(
            "Surface {}: features={} vertices={} labels={} markers={}",
            s.side, s.features, s.vertices, s.labels, s.markers
        );
    }
    if report.pair_count < report.min_transform_pairs {
        println!(
            "Not ready: at least {} control point pairs required",
            report.min_transform_pairs
        );
    }
}

fn format_opt(val: Option<[f64; 2]>) -> String {
    val.map(|v| format!("[{:.3}, {:.3}]", v[0], v[1]))
        .unwrap_or_else(|| "-".to_string())
}

fn usage() -> Error {
    Error::Usage("Usage: pair_replay <config.json>".to_string())
}
