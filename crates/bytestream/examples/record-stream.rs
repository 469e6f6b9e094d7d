//! Stream typed records over a socket pair as SLIP frames.
//!
//! Run with: `cargo run -p bytestream --example record-stream`

use std::os::unix::net::UnixStream;
use std::thread;

use bytestream::frame::{FrameConfig, FrameMode, FrameReader, FrameWriter};
use bytestream::record::{Atom, ByteOrder, Record};

const LAYOUT: [&str; 3] = ["u32", "i16[3]", "f32[]"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (left, right) = UnixStream::pair()?;
    let config = FrameConfig::with_mode(FrameMode::Slip);

    let producer = {
        let config = config.clone();
        thread::spawn(move || -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            let mut writer = FrameWriter::with_config(left, config);
            let mut record = Record::parse(LAYOUT)?;
            for seq in 0..4i64 {
                record.load(0, seq)?;
                record.load(1, &[Atom::Int(-seq), Atom::Int(192), Atom::Int(219)])?;
                let samples: Vec<Atom> = (0..seq).map(|i| Atom::Float(i as f64 * 0.5)).collect();
                record.load(2, &samples)?;
                writer.send(&record.to_bytes(ByteOrder::Network)?)?;
            }
            Ok(())
        })
    };

    let reader = FrameReader::with_config(right, config);
    let mut record = Record::parse(LAYOUT)?;
    for frame in reader {
        let frame = frame?;
        record.decode(&frame, ByteOrder::Network)?;
        println!("{} bytes -> {:?}", frame.len(), record.to_atoms());
    }

    producer
        .join()
        .map_err(|_| "producer thread panicked")?
        .map_err(|err| err.to_string())?;
    Ok(())
}
