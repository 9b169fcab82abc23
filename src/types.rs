// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Render option sent along with every compile request.
///
/// The compile service injects it as the document's main font, so the known
/// set is the set of fonts installed next to the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum RenderOption {
    #[default]
    #[serde(rename = "Liberation Sans")]
    LiberationSans,
    #[serde(rename = "Liberation Serif")]
    LiberationSerif,
    #[serde(rename = "Liberation Mono")]
    LiberationMono,
    /// Bundled custom font.
    #[serde(rename = "Fontin")]
    Fontin,
}

impl RenderOption {
    pub const ALL: [RenderOption; 4] = [
        RenderOption::LiberationSans,
        RenderOption::LiberationSerif,
        RenderOption::LiberationMono,
        RenderOption::Fontin,
    ];

    /// Name used on the wire and in persisted state.
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderOption::LiberationSans => "Liberation Sans",
            RenderOption::LiberationSerif => "Liberation Serif",
            RenderOption::LiberationMono => "Liberation Mono",
            RenderOption::Fontin => "Fontin",
        }
    }
}

impl fmt::Display for RenderOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        RenderOption::ALL
            .into_iter()
            .find(|opt| opt.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let known: Vec<_> = RenderOption::ALL.iter().map(|o| o.as_str()).collect();
                format!("unknown render option: {wanted:?} (expected one of {known:?})")
            })
    }
}
