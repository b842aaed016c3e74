#[cfg(feature = "display")]
use imageproc::window;
use clap::{Arg, App};
use log::info;

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use lpr_locate::{ utils, LocateConfig, PlateLocator };


fn main() -> Result<(), Box<dyn Error>>{
    let matches = App::new("LPR locate")
                    .version("0.1.0")
                    .author("kingrong")
                    .about("Finds the license plate region in a car photo")
                    .arg(Arg::with_name("INPUT")
                        .help("image file with license plate")
                        .required(true)
                        .index(1))
                    .arg(Arg::with_name("OUTPUT")
                        .help("where to write the detection image, defaults to output_images/<name>_output.png")
                        .index(2))
                    .arg(Arg::with_name("crop")
                        .long("crop")
                        .takes_value(true)
                        .value_name("PATH")
                        .help("write the greyscale plate region here, e.g. for an OCR engine"))
                    .arg(Arg::with_name("threshold")
                        .long("threshold")
                        .takes_value(true)
                        .help("contrast threshold in 0..=255"))
                    .arg(Arg::with_name("dilations")
                        .long("dilations")
                        .takes_value(true))
                    .arg(Arg::with_name("erosions")
                        .long("erosions")
                        .takes_value(true))
                    .arg(Arg::with_name("fallback")
                        .long("fallback")
                        .help("use a centered region instead of failing when no plate is found"))
                    .arg(Arg::with_name("verbose")
                        .short("v")
                        .help("log every stage"))
                    .get_matches();

    let default_level = if matches.is_present("verbose") { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let file_name = matches.value_of("INPUT").ok_or("image is required")?;

    let mut config = LocateConfig::default();
    if let Some(threshold) = matches.value_of("threshold") {
        config = config.with_threshold(threshold.parse()?);
    }
    let dilations = matches.value_of("dilations").map(str::parse::<usize>).transpose()?.unwrap_or(config.dilations);
    let erosions = matches.value_of("erosions").map(str::parse::<usize>).transpose()?.unwrap_or(config.erosions);
    config = config.with_morphology(dilations, erosions);

    let (red, green, blue) = utils::open_channels(file_name)?;
    info!("read image width={}, height={}", red.width(), red.height());

    let locator = PlateLocator::new(config);
    let detection = if matches.is_present("fallback") {
        locator.locate_or_default(&red, &green, &blue)?
    } else {
        locator.locate(&red, &green, &blue)?
    };
    let bbox = detection.bbox;
    println!("{} {} {} {}", bbox.min_col, bbox.min_row, bbox.max_col, bbox.max_row);

    let output = match matches.value_of("OUTPUT") {
        Some(path) => PathBuf::from(path),
        None => default_output(file_name)?,
    };
    let res_img = utils::draw_detection(&detection.binary.to_levels(255), &bbox);
    res_img.save(&output)?;
    info!("detection written to {:?}", output);

    if let Some(crop) = matches.value_of("crop") {
        utils::grid_to_luma(&detection.plate()).save(crop)?;
        info!("plate written to {}", crop);
    }

    #[cfg(feature = "display")]
    window::display_image("res", &image::DynamicImage::ImageRgb8(res_img).to_rgba8(), 700, 700);

    Ok(())
}

fn default_output(input: &str) -> Result<PathBuf, Box<dyn Error>> {
    let dir = Path::new("output_images");
    fs::create_dir_all(dir)?;
    let stem = Path::new(input).file_stem().ok_or("input has no file name")?;
    Ok(dir.join(format!("{}_output.png", stem.to_string_lossy())))
}
