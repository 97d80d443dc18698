use std::path::Path;

use crate::config::TrackDisplayField;

fn trimmed(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

/// Compose the playlist label for a track from `fields`, joined by `sep`.
///
/// Missing or blank fields are skipped; if nothing is left the bare title is
/// used so every track has a non-empty label.
pub fn display_from_fields(
    path: &Path,
    title: &str,
    artist: Option<&str>,
    album: Option<&str>,
    fields: &[TrackDisplayField],
    sep: &str,
) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str());
    let parts: Vec<String> = fields
        .iter()
        .flat_map(|f| -> Vec<Option<String>> {
            match f {
                TrackDisplayField::Display => vec![
                    trimmed(artist).map(str::to_string),
                    trimmed(Some(title)).map(str::to_string),
                ],
                TrackDisplayField::Title => vec![trimmed(Some(title)).map(str::to_string)],
                TrackDisplayField::Artist => vec![trimmed(artist).map(str::to_string)],
                TrackDisplayField::Album => vec![trimmed(album).map(str::to_string)],
                TrackDisplayField::Filename => vec![trimmed(stem).map(str::to_string)],
                TrackDisplayField::Path => vec![Some(path.display().to_string())],
            }
        })
        .flatten()
        .collect();

    if parts.is_empty() {
        title.to_string()
    } else {
        parts.join(sep)
    }
}
