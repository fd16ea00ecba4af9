use std::io::{self, BufRead, BufWriter, Write};

use clap::{Parser, ValueEnum};
use rfoasis::{
    logging,
    stream::{write_body, LossStreamWriter},
    LossRecord, StreamKind,
};
use tracing::{debug, error, info};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    Item,
    Coverage,
    Loss,
}

impl From<Kind> for StreamKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Item => StreamKind::Item,
            Kind::Coverage => StreamKind::Coverage,
            Kind::Loss => StreamKind::Loss,
        }
    }
}

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(
    about = "Convert sorted event_id,target_id,sidx,loss CSV on stdin into a grouped loss stream on stdout"
)]
struct Cli {
    /// Stream kind written to the header
    #[arg(long, value_enum, default_value = "item")]
    kind: Kind,

    /// Samples per key written to the header
    #[arg(long, short = 'S')]
    samples: i32,

    /// Write only the body, starting with a separator (continues an
    /// existing stream)
    #[arg(long)]
    append: bool,
}

fn parse_line(line: &str) -> Option<LossRecord> {
    let mut fields = line.split(',').map(str::trim);
    let event_id = fields.next()?.parse().ok()?;
    let target_id = fields.next()?.parse().ok()?;
    let sidx = fields.next()?.parse().ok()?;
    let loss = fields.next()?.parse().ok()?;
    Some(LossRecord::new(event_id, target_id, sidx, loss))
}

fn read_records() -> io::Result<Vec<LossRecord>> {
    let mut records = Vec::new();
    for (i, line) in io::stdin().lock().lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(&line) {
            Some(record) => records.push(record),
            // header row
            None if i == 0 => debug!("Skipping header: {line}"),
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("line {}: expected event_id,target_id,sidx,loss", i + 1),
                ))
            }
        }
    }
    Ok(records)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let cli = Cli::parse();

    let records = read_records()?;
    info!("Read {} loss records", records.len());

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if cli.append {
        write_body(&mut out, &records, true)?;
        out.flush()?;
        return Ok(());
    }

    let Some(mut writer) = LossStreamWriter::new(out, cli.kind.into(), cli.samples)? else {
        error!("Sample count must be positive, got {}", cli.samples);
        std::process::exit(1);
    };
    writer.write_batch(&records)?;
    writer.finish()?;
    Ok(())
}
