//! `register`, `attend`, `rate` and `feedback` command implementations.
//!
//! Each command loads the preference store, applies one mutation and prints
//! the resulting snapshot. `rate` and `feedback` resolve the event's
//! category against the catalog when one is configured; without a catalog
//! the rating skips the category credit and feedback credits `General`.
//! A configured catalog that cannot be fetched fails the command before
//! anything is written.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use eventwise_core::{Catalog, EventId, Stars};
use log::warn;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::output::{InteractionReport, write_json};
use crate::session::{CatalogConfig, SessionBuilder, StoreConfig, env_var, fetch_catalog};
use crate::{
    ARG_API_KEY, ARG_BACKEND_URL, ARG_CATALOG, ARG_EVENT, ARG_STARS, ARG_STATE_DIR, ARG_STORE,
    CliError,
};

/// One preference mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Interaction {
    Register,
    Attend,
    Rate(Stars),
    Feedback(Stars),
}

/// Star-valued interactions, before the stars are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StarsAction {
    Rate,
    Feedback,
}

impl StarsAction {
    const fn command(self) -> &'static str {
        match self {
            Self::Rate => "rate",
            Self::Feedback => "feedback",
        }
    }

    const fn with(self, stars: Stars) -> Interaction {
        match self {
            Self::Rate => Interaction::Rate(stars),
            Self::Feedback => Interaction::Feedback(stars),
        }
    }
}

impl Interaction {
    const fn command(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Attend => "attend",
            Self::Rate(_) => "rate",
            Self::Feedback(_) => "feedback",
        }
    }
}

/// Options shared by `register` and `attend` after merging.
#[derive(Debug, Clone, Default)]
pub(crate) struct MarkOptions {
    pub(crate) event: Option<String>,
    pub(crate) state_dir: Option<Utf8PathBuf>,
    pub(crate) store: Option<String>,
}

/// Options shared by `rate` and `feedback` after merging.
#[derive(Debug, Clone, Default)]
pub(crate) struct StarsOptions {
    pub(crate) event: Option<String>,
    pub(crate) stars: Option<u8>,
    pub(crate) catalog: Option<Utf8PathBuf>,
    pub(crate) backend_url: Option<String>,
    pub(crate) api_key: Option<String>,
    pub(crate) state_dir: Option<Utf8PathBuf>,
    pub(crate) store: Option<String>,
}

macro_rules! mark_args {
    ($name:ident, $command:literal, $about:literal) => {
        #[doc = concat!("CLI arguments for the `", $command, "` subcommand.")]
        #[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
        #[command(name = $command, about = $about)]
        #[ortho_config(prefix = "EVENTWISE")]
        pub(crate) struct $name {
            /// Identifier of the event.
            #[arg(value_name = "event")]
            #[serde(default)]
            pub(crate) event: Option<String>,
            /// Directory holding the preference snapshot.
            #[arg(long = ARG_STATE_DIR, value_name = "dir")]
            #[serde(default)]
            pub(crate) state_dir: Option<Utf8PathBuf>,
            /// Preference backend: `file` or `sqlite`.
            #[arg(long = ARG_STORE, value_name = "backend")]
            #[serde(default)]
            pub(crate) store: Option<String>,
        }

        impl $name {
            pub(crate) fn into_options(self) -> Result<MarkOptions, CliError> {
                let merged = self.load_and_merge().map_err(CliError::Configuration)?;
                Ok(MarkOptions {
                    event: merged.event,
                    state_dir: merged.state_dir,
                    store: merged.store,
                })
            }
        }
    };
}

macro_rules! stars_args {
    ($name:ident, $command:literal, $about:literal) => {
        #[doc = concat!("CLI arguments for the `", $command, "` subcommand.")]
        #[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
        #[command(name = $command, about = $about)]
        #[ortho_config(prefix = "EVENTWISE")]
        pub(crate) struct $name {
            /// Identifier of the event.
            #[arg(value_name = "event")]
            #[serde(default)]
            pub(crate) event: Option<String>,
            /// Whole stars from 1 to 5.
            #[arg(value_name = "stars")]
            #[serde(default)]
            pub(crate) stars: Option<u8>,
            /// Path to a JSON export of event rows.
            #[arg(long = ARG_CATALOG, value_name = "path")]
            #[serde(default)]
            pub(crate) catalog: Option<Utf8PathBuf>,
            /// Backend base URL used when no catalog file is given.
            #[arg(long = ARG_BACKEND_URL, value_name = "url")]
            #[serde(default)]
            pub(crate) backend_url: Option<String>,
            /// Backend API key.
            #[arg(long = ARG_API_KEY, value_name = "key")]
            #[serde(default)]
            pub(crate) api_key: Option<String>,
            /// Directory holding the preference snapshot.
            #[arg(long = ARG_STATE_DIR, value_name = "dir")]
            #[serde(default)]
            pub(crate) state_dir: Option<Utf8PathBuf>,
            /// Preference backend: `file` or `sqlite`.
            #[arg(long = ARG_STORE, value_name = "backend")]
            #[serde(default)]
            pub(crate) store: Option<String>,
        }

        impl $name {
            pub(crate) fn into_options(self) -> Result<StarsOptions, CliError> {
                let merged = self.load_and_merge().map_err(CliError::Configuration)?;
                Ok(StarsOptions {
                    event: merged.event,
                    stars: merged.stars,
                    catalog: merged.catalog,
                    backend_url: merged.backend_url,
                    api_key: merged.api_key,
                    state_dir: merged.state_dir,
                    store: merged.store,
                })
            }
        }
    };
}

mark_args!(RegisterArgs, "register", "Register for an event");
mark_args!(AttendArgs, "attend", "Mark an event as attended");
stars_args!(RateArgs, "rate", "Rate an event from 1 to 5 stars");
stars_args!(FeedbackArgs, "feedback", "Give feedback on an event from 1 to 5 stars");

/// Resolved interaction configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InteractionConfig {
    pub(crate) interaction: Interaction,
    pub(crate) event: EventId,
    pub(crate) catalog: Option<CatalogConfig>,
    pub(crate) store: StoreConfig,
}

fn require_event(command: &'static str, event: Option<String>) -> Result<EventId, CliError> {
    event.map(EventId::new).ok_or_else(|| CliError::MissingArgument {
        field: ARG_EVENT,
        env: env_var(command, ARG_EVENT),
    })
}

impl InteractionConfig {
    pub(crate) fn from_mark(
        options: MarkOptions,
        interaction: Interaction,
    ) -> Result<Self, CliError> {
        Ok(Self {
            event: require_event(interaction.command(), options.event)?,
            interaction,
            catalog: None,
            store: StoreConfig::resolve(options.state_dir, options.store.as_deref())?,
        })
    }

    pub(crate) fn from_stars(options: StarsOptions, action: StarsAction) -> Result<Self, CliError> {
        let command = action.command();
        let event = require_event(command, options.event)?;
        let raw = options.stars.ok_or_else(|| CliError::MissingArgument {
            field: ARG_STARS,
            env: env_var(command, ARG_STARS),
        })?;
        let interaction = action.with(Stars::new(raw)?);
        Ok(Self {
            interaction,
            event,
            catalog: CatalogConfig::resolve(
                command,
                options.catalog,
                options.backend_url,
                options.api_key,
            )?,
            store: StoreConfig::resolve(options.state_dir, options.store.as_deref())?,
        })
    }
}

pub(crate) fn run_mark_with(
    options: MarkOptions,
    interaction: Interaction,
    builder: &dyn SessionBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = InteractionConfig::from_mark(options, interaction)?;
    execute_interaction(&config, builder, writer)
}

pub(crate) fn run_stars_with(
    options: StarsOptions,
    action: StarsAction,
    builder: &dyn SessionBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = InteractionConfig::from_stars(options, action)?;
    execute_interaction(&config, builder, writer)
}

fn load_catalog(
    config: &InteractionConfig,
    builder: &dyn SessionBuilder,
) -> Result<Catalog, CliError> {
    match &config.catalog {
        Some(catalog) => fetch_catalog(builder, catalog),
        None => {
            warn!(
                "no catalog configured for `{}`; the event's category cannot be resolved",
                config.interaction.command()
            );
            Ok(Catalog::empty())
        }
    }
}

pub(crate) fn execute_interaction(
    config: &InteractionConfig,
    builder: &dyn SessionBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let catalog = match config.interaction {
        Interaction::Register | Interaction::Attend => Catalog::empty(),
        Interaction::Rate(_) | Interaction::Feedback(_) => load_catalog(config, builder)?,
    };
    let mut store = eventwise_scorer::PreferenceStore::load(
        builder.preference_backend(&config.store)?,
    );
    let event = config.event.clone();
    let changed = match config.interaction {
        Interaction::Register => store.register_event(event),
        Interaction::Attend => store.mark_attended(event),
        Interaction::Rate(stars) => {
            store.rate_event(event, stars, &catalog);
            true
        }
        Interaction::Feedback(stars) => {
            store.submit_feedback(event, stars, &catalog);
            true
        }
    };
    let report = InteractionReport {
        action: config.interaction.command(),
        event: config.event.as_str(),
        changed,
        preferences: store.snapshot(),
    };
    write_json(writer, &report)
}
