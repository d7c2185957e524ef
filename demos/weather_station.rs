// SPDX-License-Identifier: MPL-2.0

//! Weather station demo driver.
//!
//! Wires the bundled displays and an async consumer to a publisher, then
//! publishes a few readings.
//!
//! # Usage
//!
//! ```bash
//! # Built-in readings
//! cargo run --example weather_station
//!
//! # Readings as JSON arguments
//! cargo run --example weather_station -- \
//!     '{"temperature": 25, "humidity": 34, "pressure": 756}' \
//!     '{"temperature": 30, "humidity": 29, "pressure": 759}'
//!
//! # With debug logs
//! RUST_LOG=weather_station=debug cargo run --example weather_station
//! ```

use std::env;
use std::sync::Arc;

use weather_station::display::{CurrentConditions, Render, Statistics, TrendSubscriber};
use weather_station::event::ReadingBus;
use weather_station::{Publisher, PublisherConfig, Reading};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let readings: Vec<Reading> = {
        let args: Vec<String> = env::args().skip(1).collect();
        if args.is_empty() {
            vec![
                Reading::new(25.0, 34.0, 756.0),
                Reading::new(30.0, 29.0, 759.0),
                Reading::new(28.0, 45.0, 757.0),
            ]
        } else {
            args.iter()
                .map(String::as_str)
                .map(Reading::from_json_str)
                .collect::<Result<_, _>>()?
        }
    };

    let publisher = Publisher::with_config(PublisherConfig::new().with_name("demo"));

    let conditions = Arc::new(CurrentConditions::new());
    let stats = Arc::new(Statistics::new());
    let trend = Arc::new(TrendSubscriber::new());
    let bus = Arc::new(ReadingBus::new());

    publisher.register(conditions.clone());
    publisher.register(stats.clone());
    publisher.register(trend.clone());

    // Slow consumer runs on its own task, fed through the bus
    let mut rx = bus.subscribe();
    let expected = readings.len();
    let archiver = tokio::spawn(async move {
        let mut archived = Vec::new();
        while archived.len() < expected {
            match rx.recv().await {
                Ok(reading) => archived.push(serde_json::to_string(&reading)?),
                Err(_) => break,
            }
        }
        Ok::<_, serde_json::Error>(archived)
    });
    publisher.register(bus);

    for reading in readings {
        let report = publisher.publish(reading);
        println!("--- {reading} ({} delivered)", report.delivered());
        for line in [conditions.render(), stats.render(), trend.render()] {
            println!("{line}");
        }
    }

    for line in archiver.await?? {
        println!("archived: {line}");
    }

    Ok(())
}
