/// Name of the `index`-th package (0-based) on `level`, for a tree whose top
/// level is `max_level`.
///
/// The top level is always `app-NN`. Lower levels encode their 1-based level
/// number in the name so every `(level, index)` pair maps to a distinct name.
#[must_use]
pub fn package_name(level: usize, index: usize, max_level: usize) -> String {
    let index = index + 1;
    let level_label = level + 1;
    if level == max_level {
        return format!("app-{index:02}");
    }
    let prefix = match level {
        0 => "lib",
        1 => "helper-lib",
        2 => "compound-lib",
        _ => "super-lib",
    };
    format!("{prefix}-{level_label}_{index:02}")
}
