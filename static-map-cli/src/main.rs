use std::error::Error;
use std::io::{self, Write};

use anyhow::{anyhow, Context};
use static_map_sig::{
    verify_url, ImageFormat, LatLng, MapRequest, MapType, Markers, Path, QueryLike,
    SigningConfig, SigningExt, DEFAULT_HOST, DEFAULT_PATH,
};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
enum Mode {
    /// Print the canonical query string without signing it
    Encode,
    /// Print the full signed URL
    Sign,
    /// Check the signature on an existing URL
    Verify {
        /// The URL to verify
        #[structopt(long)]
        url: String,
    },
}

#[derive(Debug, StructOpt)]
#[structopt(about = "Builds and signs static map URLs.")]
struct Opt {
    #[structopt(subcommand)]
    mode: Mode,

    /// Service host, including the scheme.
    #[structopt(long, global = true)]
    host: Option<String>,

    /// Service path. This is the part of the URL covered by the signature.
    #[structopt(long, global = true)]
    path: Option<String>,

    /// Client identifier, sent as the `client` parameter.
    #[structopt(long, global = true)]
    client_id: Option<String>,

    /// Base64url encoded signing secret.
    #[structopt(long, global = true, env = "STATIC_MAP_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// Address or `lat,lng` at the center of the map.
    #[structopt(long, global = true)]
    center: Option<String>,

    #[structopt(long, global = true)]
    zoom: Option<u32>,

    /// Image dimensions, e.g. 600x400.
    #[structopt(long, global = true)]
    size: Option<String>,

    #[structopt(long, global = true)]
    scale: Option<u32>,

    /// One of: PNG, PNG8, PNG32, GIF, JPG, JPG-BASELINE.
    #[structopt(long, global = true)]
    format: Option<ImageFormat>,

    /// One of: ROADMAP, SATELLITE, TERRAIN, HYBRID.
    #[structopt(long, global = true)]
    maptype: Option<MapType>,

    #[structopt(long, global = true)]
    language: Option<String>,

    #[structopt(long, global = true)]
    region: Option<String>,

    /// A marker location as `lat,lng`. May be repeated.
    #[structopt(long = "marker", global = true, number_of_values = 1)]
    markers: Vec<LatLng>,

    #[structopt(long, global = true)]
    marker_color: Option<String>,

    #[structopt(long, global = true)]
    marker_size: Option<String>,

    #[structopt(long, global = true)]
    marker_label: Option<String>,

    /// A path point as `lat,lng`. May be repeated.
    #[structopt(long = "path-point", global = true, number_of_values = 1)]
    path_points: Vec<LatLng>,

    #[structopt(long, global = true)]
    path_weight: Option<u32>,

    #[structopt(long, global = true)]
    path_color: Option<String>,

    #[structopt(long, global = true)]
    path_fillcolor: Option<String>,

    #[structopt(long, global = true)]
    geodesic: bool,

    /// A location to keep visible, as `lat,lng`. May be repeated.
    #[structopt(long, global = true, number_of_values = 1)]
    visible: Vec<LatLng>,

    /// Custom feature style.
    #[structopt(long, global = true)]
    style: Option<String>,
}

impl Opt {
    fn map_request(&self) -> MapRequest {
        let mut req = MapRequest {
            center: self.center.clone().unwrap_or_default(),
            zoom: self.zoom.unwrap_or_default(),
            size: self.size.clone().unwrap_or_default(),
            scale: self.scale.unwrap_or_default(),
            format: self.format,
            map_type: self.maptype,
            language: self.language.clone().unwrap_or_default(),
            region: self.region.clone().unwrap_or_default(),
            visible: self.visible.clone(),
            style: self.style.clone().unwrap_or_default(),
            ..MapRequest::default()
        };

        let has_marker_style = self.marker_color.is_some()
            || self.marker_size.is_some()
            || self.marker_label.is_some();
        if has_marker_style || !self.markers.is_empty() {
            let mut markers = Markers {
                locations: self.markers.clone(),
                ..Markers::default()
            };
            markers.style.color = self.marker_color.clone().unwrap_or_default();
            markers.style.size = self.marker_size.clone().unwrap_or_default();
            markers.style.label = self.marker_label.clone().unwrap_or_default();
            req.markers = Some(markers);
        }

        let has_path_style = self.path_weight.is_some()
            || self.path_color.is_some()
            || self.path_fillcolor.is_some()
            || self.geodesic;
        if has_path_style || !self.path_points.is_empty() {
            let mut path = Path {
                points: self.path_points.clone(),
                ..Path::default()
            };
            path.style.weight = self.path_weight.unwrap_or_default();
            path.style.color = self.path_color.clone().unwrap_or_default();
            path.style.fill_color = self.path_fillcolor.clone().unwrap_or_default();
            path.style.geodesic = self.geodesic;
            req.path = Some(path);
        }

        req
    }

    fn signing_config(&self) -> Result<SigningConfig, Box<dyn Error>> {
        let mut config = SigningConfig::new(
            self.host.as_deref().unwrap_or(DEFAULT_HOST),
            self.path.as_deref().unwrap_or(DEFAULT_PATH),
        );

        if let Some(client_id) = self.client_id.as_deref().filter(|c| !c.is_empty()) {
            config.set_client_id(client_id);
        }

        if let Some(secret) = self.secret.as_deref() {
            config = config
                .with_encoded_secret(secret)
                .context("Invalid --secret")?;
        }

        Ok(config)
    }

    fn run<W: Write>(&self, out: &mut W) -> Result<(), Box<dyn Error>> {
        match &self.mode {
            Mode::Encode => {
                let query = self.map_request().query_params().canonicalize();
                writeln!(out, "{}", query)?;
            }
            Mode::Sign => {
                let config = self.signing_config()?;
                if config.signature().is_none() {
                    log::warn!("No secret configured, URL will be unsigned");
                }
                let url = self.map_request().signed_url(&config);
                writeln!(out, "{}", url)?;
            }
            Mode::Verify { url } => {
                let config = self.signing_config()?;
                if config.signature().is_none() {
                    return Err(anyhow!("A secret is required to verify a URL").into());
                }
                verify_url(url, &config).with_context(|| format!("{:?}", url))?;
                log::info!("Signature OK");
            }
        }

        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let opt = Opt::from_args();

    log::debug!("{:?}", opt.mode);

    opt.run(&mut io::stdout().lock())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Opt {
        Opt::from_iter_safe(std::iter::once("static-map-cli").chain(args.iter().cloned()))
            .expect("valid arguments")
    }

    #[test]
    fn builds_request_from_flags() {
        let opt = parse(&[
            "encode",
            "--center",
            "Paris",
            "--zoom",
            "5",
            "--maptype",
            "terrain",
            "--marker",
            "1,2",
            "--marker",
            "3,4",
            "--marker-color",
            "red",
        ]);
        let req = opt.map_request();
        assert_eq!(req.map_type, Some(MapType::Terrain));
        assert_eq!(
            req.query_params().canonicalize(),
            "center=Paris&maptype=TERRAIN&markers=color%3Ared%7C1%2C2%7C3%2C4&zoom=5"
        );
        assert!(req.path.is_none());
    }

    #[test]
    fn signs_with_secret() {
        let opt = parse(&["sign", "--center", "Paris", "--zoom", "5", "--secret", "Zm9vYmFy"]);
        let url = opt.map_request().signed_url(&opt.signing_config().unwrap());
        assert_eq!(
            url,
            "https://maps.googleapis.com/maps/api/staticmap?center=Paris&zoom=5&signature=yjA-EOwOw0-Ryo9nLO1ZD9By3aM"
        );
    }

    fn run(args: &[&str]) -> Result<String, Box<dyn Error>> {
        let mut out = Vec::new();
        parse(args).run(&mut out)?;
        Ok(String::from_utf8(out).expect("output is UTF-8").trim_end().to_owned())
    }

    #[test]
    fn builds_path_from_flags() {
        let opt = parse(&[
            "encode",
            "--path-point",
            "1,2",
            "--path-point",
            "3,4",
            "--path-weight",
            "5",
            "--path-color",
            "blue",
            "--geodesic",
        ]);
        let path = opt.map_request().path.expect("path from flags");
        assert_eq!(path.to_param_value(), "weight:5|color:blue|geodesic:true|1,2|3,4");
    }

    #[test]
    fn path_style_without_points_is_kept() {
        let opt = parse(&["encode", "--path-weight", "5", "--path-fillcolor", "0xFF000033"]);
        let path = opt.map_request().path.expect("path from style flags");
        assert_eq!(path.to_param_value(), "weight:5|fillcolor:0xFF000033");
        assert!(path.points.is_empty());
    }

    #[test]
    fn sign_then_verify() {
        let url = run(&["sign", "--center", "Paris", "--zoom", "5", "--secret", "Zm9vYmFy"])
            .expect("signing to succeed");
        assert!(url.ends_with("&signature=yjA-EOwOw0-Ryo9nLO1ZD9By3aM"));

        run(&["verify", "--url", url.as_str(), "--secret", "Zm9vYmFy"]).expect("URL to verify");
    }

    #[test]
    fn verify_rejects_tampered_url() {
        let url = run(&["sign", "--center", "Paris", "--zoom", "5", "--secret", "Zm9vYmFy"])
            .expect("signing to succeed");
        let tampered = url.replace("zoom=5", "zoom=6");

        run(&["verify", "--url", tampered.as_str(), "--secret", "Zm9vYmFy"])
            .expect_err("tampered URL to be rejected");
        run(&["verify", "--url", url.as_str(), "--secret", "b3RoZXI"])
            .expect_err("other secret to be rejected");
    }

    #[test]
    fn verify_requires_secret() {
        let url = "https://maps.googleapis.com/maps/api/staticmap?center=Paris&zoom=5&signature=yjA-EOwOw0-Ryo9nLO1ZD9By3aM";
        let err = run(&["verify", "--url", url]).expect_err("missing secret");
        assert!(err.to_string().contains("secret is required"));
    }

    #[test]
    fn rejects_bad_secret() {
        let opt = parse(&["sign", "--secret", "not base64!!"]);
        assert!(opt.signing_config().is_err());
    }
}
