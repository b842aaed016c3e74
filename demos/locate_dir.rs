use std::error::Error;
use std::env::args;
use std::process;
use std::time::SystemTime;
use std::fs;

use lpr_locate::{ utils, PlateLocator };

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let mut args = args();
    args.next();
    let path = args.next();
    let path = match path {
        Some(path) => path,
        None => {
            eprintln!("didn't get a image directory from args");
            process::exit(1);
        }
    };
    let locator = PlateLocator::default();
    let dir = fs::read_dir(path)?;

    let mut speeds = Vec::new();
    let mut total_amount = 0;
    let mut success = 0;
    for entry_result in dir {
        if let Ok(item) = entry_result {
            let path = item.path();
            let is_png = path.extension().map(|ext| ext == "png").unwrap_or(false);
            if !is_png {
                continue;
            }
            print!("file: {:?},  ", path);
            let before_time = SystemTime::now();
            let (red, green, blue) = utils::open_channels(&path)?;
            let res = locator.locate(&red, &green, &blue);
            let speed = SystemTime::now().duration_since(before_time)?.as_millis();
            total_amount += 1;
            speeds.push(speed);
            match res {
                Ok(detection) => {
                    success += 1;
                    println!("res: {:?}, speed: {}", detection.bbox, speed);
                }
                Err(e) => println!("res: {}, speed: {}", e, speed),
            }
        }
    }
    if speeds.is_empty() {
        println!("no png files found");
        return Ok(());
    }
    let total_speed: u128 = speeds.iter().sum();
    let average_speed = total_speed/speeds.len() as u128;
    println!("total_amount: {}, success: {}, average_speed: {}",
        total_amount, success, average_speed);
    Ok(())
}
