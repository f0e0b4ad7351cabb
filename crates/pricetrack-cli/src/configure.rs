//! Interactive editing of the settings file.

use std::io::{self, BufRead, Write};

use pricetrack_core::{ConfigError, Settings};

#[derive(Debug, Clone, Copy)]
enum Key {
    Datafile,
    ImgFolder,
    ProductsPerPlot,
}

impl Key {
    const ALL: [Key; 3] = [Key::Datafile, Key::ImgFolder, Key::ProductsPerPlot];

    fn prompt(self) -> &'static str {
        match self {
            Key::Datafile => "Path to the product data file (.json)",
            Key::ImgFolder => "Folder where price charts are stored",
            Key::ProductsPerPlot => "Number of products per chart",
        }
    }

    fn current(self, settings: &Settings) -> String {
        match self {
            Key::Datafile => settings
                .datafile
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            Key::ImgFolder => settings
                .img_folder
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            Key::ProductsPerPlot => settings.products_per_plot.to_string(),
        }
    }

    fn apply(self, settings: &mut Settings, raw: &str) -> Result<(), ConfigError> {
        match self {
            Key::Datafile => settings.update_datafile(raw),
            Key::ImgFolder => settings.update_img_folder(raw),
            Key::ProductsPerPlot => settings.update_products_per_plot(raw),
        }
    }
}

/// Prompts for each setting in turn. An empty answer keeps the current
/// value; an invalid one is reported and asked again. Stops quietly at end
/// of input, keeping whatever was already accepted.
pub(crate) fn prompt_settings<R, W>(
    settings: &mut Settings,
    input: &mut R,
    output: &mut W,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    for key in Key::ALL {
        loop {
            write!(output, "{} [{}]: ", key.prompt(), key.current(settings))?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(());
            }
            let answer = line.trim();
            if answer.is_empty() {
                break;
            }

            match key.apply(settings, answer) {
                Ok(()) => break,
                Err(e) => writeln!(output, "{e}")?,
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;

    use tempfile::TempDir;

    use super::*;

    fn run(settings: &mut Settings, answers: &str) -> String {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        prompt_settings(settings, &mut input, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn empty_answers_keep_current_values() {
        let mut settings = Settings::default();
        run(&mut settings, "\n\n\n");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn invalid_answer_is_asked_again() {
        let mut settings = Settings::default();
        let output = run(&mut settings, "\n\nzero\n0\n8\n");

        assert_eq!(settings.products_per_plot, 8);
        assert_eq!(output.matches("Number of products per chart").count(), 3);
    }

    #[test]
    fn accepted_paths_are_stored() {
        let dir = TempDir::new().unwrap();
        let datafile = dir.path().join("prices.json");
        fs::write(&datafile, "[]").unwrap();

        let mut settings = Settings::default();
        let answers = format!(
            "{}\n{}\n\n",
            dir.path().join("prices").display(),
            dir.path().display()
        );
        run(&mut settings, &answers);

        assert_eq!(settings.datafile.as_deref(), Some(datafile.as_path()));
        assert_eq!(settings.img_folder.as_deref(), Some(dir.path()));
    }

    #[test]
    fn end_of_input_stops_prompting() {
        let mut settings = Settings::default();
        let output = run(&mut settings, "");
        assert_eq!(output.matches(": ").count(), 1);
        assert_eq!(settings, Settings::default());
    }
}
