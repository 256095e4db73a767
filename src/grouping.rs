/// Key used when no group can be derived from a filename
pub const UNKNOWN_GROUP: &str = "unknown";

const DELIMITER: char = '_';

/// Derive the grouping key (video name) from a frame filename.
///
/// The key is the leading run of characters before the first `_`, so
/// `chips-t4K_t00006500_var887_hq.jpg` groups under `chips-t4K`. A filename
/// without `_` is its own key. An empty leading run yields [`UNKNOWN_GROUP`].
pub fn group_key(filename: &str) -> String {
    let prefix = filename.split(DELIMITER).next().unwrap_or_default();
    if prefix.is_empty() {
        UNKNOWN_GROUP.to_string()
    } else {
        prefix.to_string()
    }
}

/// Last path component of an object key
pub fn filename_from_key(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Output object key for an annotated frame
pub fn output_key(filename: &str) -> String {
    format!("{}/{}", group_key(filename), filename)
}
