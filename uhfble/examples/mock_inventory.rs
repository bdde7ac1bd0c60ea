//! Inventory against the in-memory reader
//!
//! Plays the part of an R6 handheld: every write is captured, tag reports
//! are injected as notifications, and the collected tags are printed as
//! CSV on stdout.
//!
//! Run with `RUST_LOG=uhfble=debug cargo run --example mock_inventory`.

use std::time::Duration;

use tokio::time::timeout;
use tracing_subscriber::EnvFilter;
use uhfble::{Command, Frame, MockTransport, Reader, ReaderEvent, TagCollection, TracingObserver};

/// EPCs the simulated reader reports, with repeats
const SIGHTINGS: [&[u8]; 5] = [
    &[0xE2, 0x80, 0x11, 0x70, 0x00, 0x00, 0x02, 0x0A, 0xBC, 0xDE, 0xF0, 0x12],
    &[0xE2, 0x00, 0x34, 0x12, 0x01, 0x23],
    &[0xE2, 0x80, 0x11, 0x70, 0x00, 0x00, 0x02, 0x0A, 0xBC, 0xDE, 0xF0, 0x12],
    &[0x30, 0x08, 0x33, 0xB2],
    &[0xE2, 0x00, 0x34, 0x12, 0x01, 0x23],
];

fn inventory_report(rssi: u8, epc: &[u8]) -> anyhow::Result<Vec<u8>> {
    let words = (epc.len() / 2) as u8;
    let mut payload = vec![0x01, rssi, words << 3, 0x00];
    payload.extend_from_slice(epc);

    let frame = Frame::with_payload(Command::InventoryReport, payload)?;
    Ok(frame.encode().to_vec())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let transport = MockTransport::new();
    let device = transport.handle();

    let mut reader = Reader::new(transport);
    reader.subscribe(std::sync::Arc::new(TracingObserver));
    let (_subscription, mut events) = reader.events();

    reader.connect().await?;
    reader.start_inventory().await?;

    for (i, epc) in SIGHTINGS.iter().enumerate() {
        device.notify(inventory_report(0xC0 + i as u8, epc)?);
    }

    let mut tags = TagCollection::new();
    while tags.total_reads() < SIGHTINGS.len() as u64 {
        match timeout(Duration::from_secs(1), events.recv()).await {
            Ok(Some(ReaderEvent::TagRead(tag))) => {
                tags.record(tag);
            }
            Ok(Some(_)) => {}
            Ok(None) | Err(_) => break,
        }
    }

    reader.stop_inventory().await?;
    reader.disconnect().await?;

    println!("Frames written:");
    for write in device.writes() {
        println!("  {:02X?}", write);
    }

    println!();
    tags.write_csv(std::io::stdout().lock())?;

    Ok(())
}
