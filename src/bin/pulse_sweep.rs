//! Pulse sweep exerciser for the PWM actuation stack.
//!
//! Sweeps steering or throttle targets through the full
//! actuator → controller → pin pipeline against the mock pin, printing the
//! pulse code and duty cycle produced at each step. Useful for checking a
//! calibration range before pointing the stack at real hardware.
//!
//! Usage:
//!   cargo run --bin pulse_sweep -- [steering|throttle] [OPTIONS]
//!
//! Options:
//!   --left-pulse <CODE>    Steering pulse at full left (default: 460)
//!   --right-pulse <CODE>   Steering pulse at full right (default: 290)
//!   --max-pulse <CODE>     Throttle pulse at full forward (default: 500)
//!   --min-pulse <CODE>     Throttle pulse at full reverse (default: 220)
//!   --zero-pulse <CODE>    Throttle pulse at stop (default: 370)
//!   --steps <N>            Number of sweep steps (default: 20)
//!   --hold-ms <MS>         Hold time per step in milliseconds (default: 50)
//!   --scale <FACTOR>       Duty-cycle scale correction (default: 1.0)
//!   --inverted             Invert the duty cycle

use std::env;
use std::error::Error;
use std::process;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rc_actuation::{
    MockPwmPin, PulseController, PwmPin, SteeringConfig, SteeringServo, ThrottleConfig, ThrottleEsc,
};

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Steering,
    Throttle,
}

struct Args {
    mode: Mode,
    steering: SteeringConfig,
    throttle: ThrottleConfig,
    steps: u32,
    hold: Duration,
    scale: f64,
    inverted: bool,
}

fn parse_args() -> Args {
    let raw: Vec<String> = env::args().collect();

    let mode = match raw.get(1).map(String::as_str) {
        Some("steering") => Mode::Steering,
        Some("throttle") => Mode::Throttle,
        Some("-h") | Some("--help") => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!(
                "Error: mode must be 'steering' or 'throttle', got {:?}",
                other.unwrap_or("nothing")
            );
            print_usage();
            process::exit(1);
        }
    };

    let mut args = Args {
        mode,
        steering: SteeringConfig::default(),
        throttle: ThrottleConfig::default(),
        steps: 20,
        hold: Duration::from_millis(50),
        scale: 1.0,
        inverted: false,
    };

    let mut i = 2;
    while i < raw.len() {
        match raw[i].as_str() {
            "--left-pulse" => {
                i += 1;
                args.steering.left_pulse = parse_num(&raw, i, "left-pulse");
            }
            "--right-pulse" => {
                i += 1;
                args.steering.right_pulse = parse_num(&raw, i, "right-pulse");
            }
            "--max-pulse" => {
                i += 1;
                args.throttle.max_pulse = parse_num(&raw, i, "max-pulse");
            }
            "--min-pulse" => {
                i += 1;
                args.throttle.min_pulse = parse_num(&raw, i, "min-pulse");
            }
            "--zero-pulse" => {
                i += 1;
                args.throttle.zero_pulse = parse_num(&raw, i, "zero-pulse");
            }
            "--steps" => {
                i += 1;
                args.steps = parse_num(&raw, i, "steps").max(1) as u32;
            }
            "--hold-ms" => {
                i += 1;
                args.hold = Duration::from_millis(parse_num(&raw, i, "hold-ms") as u64);
            }
            "--scale" => {
                i += 1;
                args.scale = parse_float(&raw, i, "scale");
            }
            "--inverted" => {
                args.inverted = true;
            }
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {other}");
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    args
}

fn parse_num(raw: &[String], i: usize, name: &str) -> i32 {
    raw.get(i)
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| {
            eprintln!("Error: --{name} requires an integer value");
            process::exit(1);
        })
}

fn parse_float(raw: &[String], i: usize, name: &str) -> f64 {
    raw.get(i)
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| {
            eprintln!("Error: --{name} requires a numeric value");
            process::exit(1);
        })
}

fn print_usage() {
    eprintln!("Pulse sweep exerciser for the PWM actuation stack");
    eprintln!();
    eprintln!("Usage: pulse_sweep [steering|throttle] [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --left-pulse <CODE>    Steering pulse at full left (default: 460)");
    eprintln!("  --right-pulse <CODE>   Steering pulse at full right (default: 290)");
    eprintln!("  --max-pulse <CODE>     Throttle pulse at full forward (default: 500)");
    eprintln!("  --min-pulse <CODE>     Throttle pulse at full reverse (default: 220)");
    eprintln!("  --zero-pulse <CODE>    Throttle pulse at stop (default: 370)");
    eprintln!("  --steps <N>            Number of sweep steps (default: 20)");
    eprintln!("  --hold-ms <MS>         Hold time per step in milliseconds (default: 50)");
    eprintln!("  --scale <FACTOR>       Duty-cycle scale correction (default: 1.0)");
    eprintln!("  --inverted             Invert the duty cycle");
    eprintln!("  -h, --help             Show this help");
}

async fn run_steering(args: &Args) -> Result<(), Box<dyn Error>> {
    let pin = MockPwmPin::new();
    let observer = pin.clone();
    let controller = PulseController::with_correction(pin, args.scale, args.inverted);
    let servo = SteeringServo::new(controller, args.steering)?;

    let drive = {
        let servo = servo.clone();
        tokio::spawn(async move { servo.continuous_drive().await })
    };

    println!("steering sweep: {} steps", args.steps);
    for step in 0..=args.steps {
        let angle = -1.0 + 2.0 * step as f64 / args.steps as f64;
        servo.set_target(angle);
        tokio::time::sleep(args.hold).await;
        println!(
            "  angle {:+.2} -> pulse {:4}  duty {:.4}",
            angle,
            servo.target_pulse(),
            observer.duty_cycle()
        );
    }

    servo.shutdown().await;
    drive.await??;
    println!("sweep complete, servo re-centered");
    Ok(())
}

async fn run_throttle(args: &Args) -> Result<(), Box<dyn Error>> {
    let pin = MockPwmPin::new();
    let observer = pin.clone();
    let controller = PulseController::with_correction(pin, args.scale, args.inverted);

    println!("calibrating ESC (about one second)...");
    let esc = ThrottleEsc::new(controller, args.throttle).await?;

    let drive = {
        let esc = esc.clone();
        tokio::spawn(async move { esc.continuous_drive().await })
    };

    println!("throttle sweep: {} steps", args.steps);
    for step in 0..=args.steps {
        let throttle = -1.0 + 2.0 * step as f64 / args.steps as f64;
        esc.set_target(throttle);
        tokio::time::sleep(args.hold).await;
        println!(
            "  throttle {:+.2} -> pulse {:4}  duty {:.4}",
            throttle,
            esc.target_pulse(),
            observer.duty_cycle()
        );
    }

    esc.shutdown()?;
    drive.await??;
    println!("sweep complete, ESC at zero pulse");
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = parse_args();
    let result = match args.mode {
        Mode::Steering => run_steering(&args).await,
        Mode::Throttle => run_throttle(&args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
