// ProxAlert - Raw Sample to Distance Conversion

use crate::config::*;

/// Convert a raw ADC sample into whole centimeters.
///
/// The calibration is applied to any input, including values outside the
/// nominal 10-bit range, and the result is rounded half away from zero.
pub fn to_centimeters(raw: i32) -> i32 {
    let cm = f64::from(raw) * CAL_FULL_SCALE_MV / CAL_ADC_DIVISOR / CAL_SENSOR_DIVISOR * CAL_CM_FACTOR;
    cm.round() as i32
}
