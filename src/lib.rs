use log::{ debug, info, warn };

use std::ops::RangeInclusive;

pub mod components;
pub mod error;
pub mod grid;
pub mod image_process;
pub mod morphology;
pub mod utils;

pub use components::{ ComponentStats, DEFAULT_ASPECT_RANGE };
pub use error::{ LprError, LprErrorKind, LprResult };
pub use grid::{ BoundingBox, Foreground, Grid, LabelGrid };

/// Knobs of the locating pipeline. The defaults are tuned for one family
/// of front-facing car photos.
#[derive(Debug, Clone, PartialEq)]
pub struct LocateConfig {
    /// Cut-off on the rescaled contrast map.
    pub contrast_threshold: u8,
    pub dilations: usize,
    pub erosions: usize,
    /// Accepted `width / height` of a plate box.
    pub aspect: RangeInclusive<f64>,
}

impl Default for LocateConfig {
    fn default() -> Self {
        Self {
            contrast_threshold: 160,
            dilations: 5,
            erosions: 4,
            aspect: DEFAULT_ASPECT_RANGE,
        }
    }
}

impl LocateConfig {
    pub fn with_threshold(mut self, contrast_threshold: u8) -> Self {
        self.contrast_threshold = contrast_threshold;
        self
    }

    pub fn with_morphology(mut self, dilations: usize, erosions: usize) -> Self {
        self.dilations = dilations;
        self.erosions = erosions;
        self
    }

    pub fn with_aspect(mut self, min: f64, max: f64) -> Self {
        self.aspect = min..=max;
        self
    }
}

/// Result of one run of the locator.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Greyscale version of the input, what a recognizer should read from.
    pub greyscale: Grid<u8>,
    /// Thresholded contrast map, for drawing.
    pub binary: Grid<bool>,
    pub bbox: BoundingBox,
    /// `false` when `bbox` is the centered fallback region.
    pub found: bool,
}

impl Detection {
    /// The plate region cut out of the greyscale image.
    pub fn plate(&self) -> Grid<u8> {
        self.greyscale.crop(&self.bbox)
    }
}

pub struct PlateLocator {
    config: LocateConfig,
}

impl PlateLocator {

    pub fn new(config: LocateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LocateConfig {
        &self.config
    }

    /// Locate the plate in an image given as three channel grids.
    pub fn locate(&self, red: &Grid<u8>, green: &Grid<u8>, blue: &Grid<u8>) -> LprResult<Detection> {
        let (greyscale, binary, (labels, stats)) = self.label_candidates(red, green, blue)?;
        let bbox = components::select_largest_component(&labels, &stats, &self.config.aspect)?;
        info!("plate located at {:?}", bbox);
        Ok(Detection { greyscale, binary, bbox, found: true })
    }

    /// Like [`PlateLocator::locate`], but falls back to a centered box of half
    /// the image size when no component looks like a plate.
    pub fn locate_or_default(&self, red: &Grid<u8>, green: &Grid<u8>, blue: &Grid<u8>) -> LprResult<Detection> {
        let (greyscale, binary, (labels, stats)) = self.label_candidates(red, green, blue)?;
        match components::select_largest_component(&labels, &stats, &self.config.aspect) {
            Ok(bbox) => {
                info!("plate located at {:?}", bbox);
                Ok(Detection { greyscale, binary, bbox, found: true })
            }
            Err(e) if e.is_no_component() => {
                let (width, height) = greyscale.dimensions();
                let bbox = BoundingBox::centered(width, height);
                warn!("{}, using default region {:?}", e, bbox);
                Ok(Detection { greyscale, binary, bbox, found: false })
            }
            Err(e) => Err(e),
        }
    }

    fn label_candidates(
        &self,
        red: &Grid<u8>,
        green: &Grid<u8>,
        blue: &Grid<u8>,
    ) -> LprResult<(Grid<u8>, Grid<bool>, (LabelGrid, ComponentStats))> {
        let config = &self.config;
        let (width, height) = red.dimensions();
        debug!("locating plate in {}x{} image", width, height);

        let greyscale = image_process::rgb_to_greyscale(red, green, blue)?;
        let stretched = image_process::scale_to_0_255(&greyscale);
        let contrast = image_process::standard_deviation_5x5(&stretched);
        let contrast = image_process::scale_to_0_255(&contrast);
        let binary = image_process::threshold_ge(&contrast, config.contrast_threshold);
        debug!("threshold {}: {} pixels on", config.contrast_threshold, binary.count_on());

        let dilated = morphology::n_dilations(&binary, config.dilations);
        let closed = morphology::n_erosions(&dilated, config.erosions);
        debug!("{} dilations, {} erosions: {} pixels on", config.dilations, config.erosions, closed.count_on());

        let components = components::label_components(&closed);
        Ok((greyscale, binary, components))
    }
}

impl Default for PlateLocator {
    fn default() -> Self {
        Self::new(LocateConfig::default())
    }
}
