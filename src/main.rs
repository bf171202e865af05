/// Native overlay renderer: paints an image map overlay to PNG.
///
/// ```text
/// pictarea-native PAGE.html --usemap #name --image-width 800 [--size 400x300]
///     [--options opts.json] [--hover N] [--select N]... [--click X,Y]... [--out overlay.png]
/// ```
///
/// Pointer actions are replayed in the order given. The derived selection
/// value is printed as JSON.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = native::run(&args) {
        eprintln!("Error: {}", e);
        eprintln!("{}", native::USAGE);
        std::process::exit(1);
    }
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::fs;

    use pictarea::{ImageMap, PictareaController, PictareaOptions, RegionId};
    use pictarea_render::RasterSurface;

    pub const USAGE: &str = "Usage: pictarea-native PAGE.html --usemap #name --image-width W \
        [--size WxH] [--options FILE] [--hover N] [--select N] [--click X,Y] [--out FILE]";

    type CliResult<T> = Result<T, Box<dyn Error>>;

    enum Action {
        Hover(usize),
        Select(usize),
        Click(f32, f32),
    }

    #[derive(Default)]
    struct Args {
        page: Option<String>,
        usemap: Option<String>,
        image_width: Option<f32>,
        size: Option<(u32, u32)>,
        options: Option<String>,
        out: Option<String>,
        actions: Vec<Action>,
    }

    fn parse_args(raw: &[String]) -> CliResult<Args> {
        let mut args = Args::default();
        let mut iter = raw.iter();
        while let Some(arg) = iter.next() {
            let mut value = || {
                iter.next()
                    .cloned()
                    .ok_or_else(|| format!("{} needs a value", arg))
            };
            match arg.as_str() {
                "--usemap" => args.usemap = Some(value()?),
                "--image-width" => args.image_width = Some(value()?.parse()?),
                "--size" => args.size = Some(parse_size(&value()?)?),
                "--options" => args.options = Some(value()?),
                "--out" => args.out = Some(value()?),
                "--hover" => args.actions.push(Action::Hover(value()?.parse()?)),
                "--select" => args.actions.push(Action::Select(value()?.parse()?)),
                "--click" => {
                    let (x, y) = parse_pair(&value()?, ',')?;
                    args.actions.push(Action::Click(x, y));
                }
                other if other.starts_with("--") => return Err(format!("Unknown option {}", other).into()),
                page => args.page = Some(page.to_string()),
            }
        }
        Ok(args)
    }

    fn parse_pair(s: &str, sep: char) -> CliResult<(f32, f32)> {
        let (a, b) = s
            .split_once(sep)
            .ok_or_else(|| format!("Expected two values separated by '{}', got {:?}", sep, s))?;
        Ok((a.trim().parse()?, b.trim().parse()?))
    }

    fn parse_size(s: &str) -> CliResult<(u32, u32)> {
        let (w, h) = s
            .split_once('x')
            .ok_or_else(|| format!("Expected WIDTHxHEIGHT, got {:?}", s))?;
        Ok((w.trim().parse()?, h.trim().parse()?))
    }

    pub fn run(raw: &[String]) -> CliResult<()> {
        let args = parse_args(raw)?;
        let page = args.page.ok_or("Missing PAGE.html")?;
        let usemap = args.usemap.ok_or("Missing --usemap")?;
        let image_width = args.image_width.ok_or("Missing --image-width")?;

        let html = fs::read_to_string(&page)?;
        let map = ImageMap::parse_html(&html, &usemap)?;
        let options = match &args.options {
            Some(path) => PictareaOptions::from_json_str(&fs::read_to_string(path)?)?,
            None => PictareaOptions::default(),
        };

        // Default display box: the natural width, square
        let natural = image_width.round().max(0.0) as u32;
        let (width, height) = args.size.unwrap_or((natural, natural));
        let surface = RasterSurface::new(width, height);
        let mut overlay = PictareaController::new(&map, image_width, surface, options)?;

        for action in &args.actions {
            match *action {
                Action::Hover(index) => {
                    if let Some(previous) = overlay.hovered() {
                        overlay.hover_leave(previous);
                    }
                    overlay.hover_enter(RegionId(index));
                }
                Action::Select(index) => {
                    if !overlay.activate(RegionId(index)) {
                        log::warn!("Activation of area #{} had no effect", index);
                    }
                }
                Action::Click(x, y) => match overlay.region_at(x, y) {
                    Some(id) => {
                        overlay.activate(id);
                    }
                    None => log::info!("No area at ({}, {})", x, y),
                },
            }
        }

        if let Some(out) = &args.out {
            let png = overlay.surface().encode_png()?;
            fs::write(out, png)?;
            log::info!("Wrote {}x{} overlay to {}", width, height, out);
        }

        println!("{}", serde_json::to_string(&overlay.value())?);
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn strings(args: &[&str]) -> Vec<String> {
            args.iter().map(|s| s.to_string()).collect()
        }

        #[test]
        fn test_parse_args() {
            let args = parse_args(&strings(&[
                "page.html",
                "--usemap",
                "#m",
                "--image-width",
                "800",
                "--size",
                "400x300",
                "--select",
                "2",
                "--click",
                "10,20",
            ]))
            .unwrap();
            assert_eq!(args.page.as_deref(), Some("page.html"));
            assert_eq!(args.usemap.as_deref(), Some("#m"));
            assert_eq!(args.image_width, Some(800.0));
            assert_eq!(args.size, Some((400, 300)));
            assert_eq!(args.actions.len(), 2);
            assert!(matches!(args.actions[1], Action::Click(x, y) if x == 10.0 && y == 20.0));
        }

        #[test]
        fn test_parse_args_errors() {
            assert!(parse_args(&strings(&["--usemap"])).is_err());
            assert!(parse_args(&strings(&["--size", "400"])).is_err());
            assert!(parse_args(&strings(&["--bogus", "1"])).is_err());
        }
    }
}
