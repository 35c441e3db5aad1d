/// Metres to inches, the unit of the host scene
pub const METERS_TO_INCHES: f64 = 39.3701;

/// Extra down-scaling applied by the legacy display mode
pub const LEGACY_DISPLAY_SCALE: f64 = 0.1;

/// Scale factor from source metres to display units.
/// `legacy` reproduces the older reduced-size presentation.
pub fn display_factor(legacy: bool) -> f64 {
    if legacy {
        METERS_TO_INCHES * LEGACY_DISPLAY_SCALE
    } else {
        METERS_TO_INCHES
    }
}
