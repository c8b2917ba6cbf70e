//! Tick Driver Example
//!
//! Drives one component through a full lifecycle. A sensor stream becomes
//! fresh every third tick; one handler consumes it, another runs every tick.
//! Each consumed reading raises an event that reports the running average.
//!
//! Run with `RUST_LOG=debug` to see the scheduler's dispatch decisions.

use cadence_core::{
    Component, ComponentConfig, DataStream, DispatchOrder, FnHandler, Lifecycle, StreamDirection,
    StreamRef,
};
use std::cell::Cell;
use std::rc::Rc;

/// Input stream whose freshness is controlled by the driver
struct Sensor {
    fresh: Cell<bool>,
    readings: Cell<u64>,
}

impl Sensor {
    fn publish(&self) {
        self.readings.set(self.readings.get() + 1);
        self.fresh.set(true);
    }

    fn consume(&self) -> u64 {
        self.fresh.set(false);
        self.readings.get()
    }
}

impl DataStream for Sensor {
    fn name(&self) -> &str {
        "sensor"
    }

    fn direction(&self) -> StreamDirection {
        StreamDirection::In
    }

    fn fresh(&self) -> bool {
        self.fresh.get()
    }
}

/// Lifecycle hooks of the averaging stage
struct Averager {
    opened: bool,
}

impl Lifecycle for Averager {
    fn on_init(&mut self) -> bool {
        self.opened = true;
        log::info!("averager: buffers allocated");
        true
    }

    fn on_finish(&mut self) -> bool {
        self.opened = false;
        log::info!("averager: buffers released");
        true
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    println!("=== Cadence Tick Driver Example ===\n");

    let sensor = Rc::new(Sensor {
        fresh: Cell::new(false),
        readings: Cell::new(0),
    });
    let sensor_stream: StreamRef = sensor.clone();

    let total = Rc::new(Cell::new(0u64));
    let samples = Rc::new(Cell::new(0u64));

    let consumer = Rc::clone(&sensor);
    let sum = Rc::clone(&total);
    let count = Rc::clone(&samples);
    let on_reading = FnHandler::shared(move || {
        let reading = consumer.consume();
        sum.set(sum.get() + reading);
        count.set(count.get() + 1);
        Ok(())
    });
    let heartbeat = FnHandler::shared(|| Ok(()));

    let sum = Rc::clone(&total);
    let count = Rc::clone(&samples);
    let reporter = FnHandler::shared(move || {
        println!(
            "  average after {} readings: {:.2}",
            count.get(),
            sum.get() as f64 / count.get() as f64
        );
        Ok(())
    });

    let config = ComponentConfig::new().with_dispatch_order(DispatchOrder::Priority);
    let mut component = Component::with_config("averager", Averager { opened: false }, config);

    component.register_stream("in_sensor", &sensor_stream)?;
    component.register_handler("on_reading", &on_reading)?;
    component.register_handler("heartbeat", &heartbeat)?;
    component.register_event("average_ready")?.connect(&reporter);
    component.add_dependency("on_reading", Some(&sensor_stream));
    component.add_dependency("heartbeat", None);

    component.print_streams();
    component.print_handlers();
    component.print_events();

    component.initialize()?;
    component.start()?;
    println!("Priority order: {:?}\n", component.priority_order());

    for tick in 1..=9 {
        if tick % 3 == 0 {
            sensor.publish();
        }
        let report = component.step()?;
        println!(
            "Tick {}: ran {:?} in {:?}",
            tick, report.executed, report.elapsed
        );
        if report.ran("on_reading") {
            if let Some(event) = component.event("average_ready") {
                event.raise()?;
            }
        }
    }

    component.stop()?;
    component.finish()?;

    println!(
        "\nSum of readings: {} (stage open: {})",
        total.get(),
        component.hooks().opened
    );

    Ok(())
}
