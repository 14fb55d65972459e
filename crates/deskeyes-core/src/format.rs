/// Short human label for an exercise duration.
///
/// Under a minute the seconds are shown as-is; from a minute up the value
/// is rounded to whole minutes.
pub fn format_duration(seconds: u32) -> String {
    if seconds >= 60 {
        let mins = (f64::from(seconds) / 60.0).round() as u32;
        format!("{mins} min")
    } else {
        format!("{seconds} sec")
    }
}

/// Minutes with at most one decimal, trailing `.0` dropped.
pub fn format_minutes(minutes: f64) -> String {
    let rounded = (minutes * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}
