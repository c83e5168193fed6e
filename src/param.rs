use std::fmt;
use std::str::FromStr;

use crate::ParseError;

/// Query parameter names understood by the static map service.
#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Param {
    /// `center`
    Center,
    /// `zoom`
    Zoom,
    /// `size`
    Size,
    /// `scale`
    Scale,
    /// `format`
    Format,
    /// `maptype`
    MapType,
    /// `language`
    Language,
    /// `region`
    Region,
    /// `markers`
    Markers,
    /// `path`
    Path,
    /// `visible`
    Visible,
    /// `style`
    Style,
    /// `client`
    Client,
    /// `signature`
    Signature,
}

impl Param {
    /// Returns the parameter name exactly as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Param::Center => "center",
            Param::Zoom => "zoom",
            Param::Size => "size",
            Param::Scale => "scale",
            Param::Format => "format",
            Param::MapType => "maptype",
            Param::Language => "language",
            Param::Region => "region",
            Param::Markers => "markers",
            Param::Path => "path",
            Param::Visible => "visible",
            Param::Style => "style",
            Param::Client => "client",
            Param::Signature => "signature",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:literal,)* }) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                #[doc = concat!("`", $value, "`")]
                $variant,
            )*
        }

        impl $name {
            /// Returns the value exactly as sent on the wire.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseError;
            fn from_str(s: &str) -> Result<$name, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($value) {
                        return Ok($name::$variant);
                    }
                )*
                Err(ParseError::$name(s.into()))
            }
        }
    };
}

wire_enum! {
    /// Image format of the generated map.
    ImageFormat {
        Png = "PNG",
        Png8 = "PNG8",
        Png32 = "PNG32",
        Gif = "GIF",
        Jpg = "JPG",
        JpgBaseline = "JPG-BASELINE",
    }
}

wire_enum! {
    /// Rendering style of the generated map.
    MapType {
        Roadmap = "ROADMAP",
        Satellite = "SATELLITE",
        Terrain = "TERRAIN",
        Hybrid = "HYBRID",
    }
}
