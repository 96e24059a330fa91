//! The search → fetch → filter → export run behind `get-papers-list`.

use super::*;

/// Loads the configuration for a run: `--config` when given, otherwise the default
/// location, with `--email` applied on top.
pub fn load_config(cli: &Cli) -> Result<Config> {
  let config = match &cli.config {
    Some(path) => Config::from_path(path)?,
    None => Config::load()?,
  };

  Ok(match &cli.email {
    Some(email) => config.with_email(email),
    None => config,
  })
}

/// Runs the query described by `cli` and reports through `interaction`.
pub async fn find<I: UserInteraction>(interaction: &I, cli: &Cli) -> Result<()> {
  debug!("Query: {}", cli.query);
  debug!(
    "Output file: {}",
    cli.file.as_ref().map_or_else(|| "console".to_string(), |path| path.display().to_string())
  );

  let finder = PharmaPapers::new(load_config(cli)?)?;

  let Some(rows) = finder.find(&cli.query, cli.max_results).await? else {
    return interaction.reply(ResponseContent::Info("No papers found matching the query."));
  };

  match &cli.file {
    Some(path) =>
      if export::write_csv(&rows, path)? {
        interaction
          .reply(ResponseContent::Success(&format!("Results saved to {}", path.display())))
      } else {
        interaction.reply(ResponseContent::Info(&format!(
          "No papers with industry-affiliated authors found, {} was not written",
          path.display()
        )))
      },
    None if rows.is_empty() =>
      interaction.reply(ResponseContent::Info("No papers with industry-affiliated authors found.")),
    None => interaction.reply(ResponseContent::Report(&export::to_csv_string(&rows)?)),
  }
}
