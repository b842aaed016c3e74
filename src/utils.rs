//! Glue between the `image` crate and the locator grids.

use image::{ DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, RgbImage };
use imageproc::{ drawing, rect };

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

use crate::error::LprResult;
use crate::grid::{ BoundingBox, Grid };

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Split an image into red, green and blue grids.
pub fn split_channels(img: &DynamicImage) -> LprResult<(Grid<u8>, Grid<u8>, Grid<u8>)> {
    let img = img.to_rgb8();
    let (width, height) = (img.width() as usize, img.height() as usize);
    let mut red = Vec::with_capacity(width * height);
    let mut green = Vec::with_capacity(width * height);
    let mut blue = Vec::with_capacity(width * height);
    for pixel in img.pixels() {
        let Rgb([r, g, b]) = *pixel;
        red.push(r);
        green.push(g);
        blue.push(b);
    }
    Ok((
        Grid::from_vec(width, height, red)?,
        Grid::from_vec(width, height, green)?,
        Grid::from_vec(width, height, blue)?,
    ))
}

/// Read an image file and split it into red, green and blue grids.
///
/// A file that cannot be read is an IO error, one that cannot be decoded an image error.
pub fn open_channels(path: impl AsRef<Path>) -> LprResult<(Grid<u8>, Grid<u8>, Grid<u8>)> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    let img = image::load_from_memory(&bytes)?;
    split_channels(&img)
}

pub fn grid_to_luma(grid: &Grid<u8>) -> GrayImage {
    let (width, height) = grid.dimensions();
    ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        Luma([*grid.get(y as usize, x as usize)])
    })
}

/// Draw `bbox` as a hollow rectangle onto a copy of `grid`.
pub fn draw_detection(grid: &Grid<u8>, bbox: &BoundingBox) -> RgbImage {
    let mut canvas = DynamicImage::ImageLuma8(grid_to_luma(grid)).to_rgb8();
    let rect = rect::Rect::at(bbox.min_col as i32, bbox.min_row as i32)
        .of_size(bbox.width() as u32, bbox.height() as u32);
    drawing::draw_hollow_rect_mut(&mut canvas, rect, BOX_COLOR);
    canvas
}
