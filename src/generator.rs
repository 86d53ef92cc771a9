// src/generator.rs
use crate::error::GenerateError;
use banded_render_core::Renderer;
use banded_report::{ProcessConfig, Report, RunSummary};
use banded_source::{ConnectionParams, DataSource, VecDataSource};
use indexmap::IndexMap;

/// The name of the data source that drives pagination by default.
pub const MAIN_SOURCE: &str = "main";

type Sources = IndexMap<String, Box<dyn DataSource>>;

/// A builder that opens a report's data sources and runs it through a
/// renderer.
///
/// Sources given to the generator replace the report's own. Without either,
/// the report runs once over a single row holding `1`.
pub struct ReportGenerator {
    report: Report,
    sources: Sources,
    main_source: Option<String>,
    params: ConnectionParams,
    config: ProcessConfig,
}

impl ReportGenerator {
    pub fn new(report: Report) -> Self {
        Self {
            report,
            sources: IndexMap::new(),
            main_source: None,
            params: ConnectionParams::default(),
            config: ProcessConfig::default(),
        }
    }

    /// Adds a data source for this generator.
    pub fn with_source(mut self, name: impl Into<String>, source: impl DataSource + 'static) -> Self {
        self.sources.insert(name.into(), Box::new(source));
        self
    }

    /// Selects the source that drives pagination. Defaults to `main`, or
    /// the first source when there is no `main`.
    pub fn with_main_source(mut self, name: impl Into<String>) -> Self {
        self.main_source = Some(name.into());
        self
    }

    /// Connection arguments handed to every source when it is opened.
    pub fn with_connection_params(mut self, params: ConnectionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_config(mut self, config: ProcessConfig) -> Self {
        self.config = config;
        self
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn report_mut(&mut self) -> &mut Report {
        &mut self.report
    }

    pub fn into_report(self) -> Report {
        self.report
    }

    /// Opens every data source and processes the report over the main one.
    ///
    /// Can be called repeatedly; sources are reopened on every call.
    pub fn generate<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
    ) -> Result<RunSummary, GenerateError> {
        let from_report = self.sources.is_empty();
        let mut sources = if from_report {
            self.report.take_data_sources()
        } else {
            std::mem::take(&mut self.sources)
        };

        let result = self.run(&mut sources, renderer);

        if from_report {
            self.report.restore_data_sources(sources);
        } else {
            self.sources = sources;
        }
        result
    }

    fn run<R: Renderer + ?Sized>(
        &mut self,
        sources: &mut Sources,
        renderer: &mut R,
    ) -> Result<RunSummary, GenerateError> {
        if sources.is_empty() {
            log::debug!("No data sources configured; using a single-row source");
            let mut fallback = VecDataSource::single_row();
            open(MAIN_SOURCE, &mut fallback, &self.params)?;
            return Ok(self.report.process(renderer, &mut fallback, &self.config)?);
        }

        let main = self.main_source_index(sources)?;
        for (name, source) in sources.iter_mut() {
            open(name, source.as_mut(), &self.params)?;
        }

        let (name, source) = sources
            .get_index_mut(main)
            .ok_or_else(|| unknown_source(MAIN_SOURCE, sources_list(&[])))?;
        log::debug!("Processing over data source '{}'", name);
        Ok(self.report.process(renderer, source.as_mut(), &self.config)?)
    }

    fn main_source_index(&self, sources: &Sources) -> Result<usize, GenerateError> {
        match &self.main_source {
            Some(name) => sources.get_index_of(name.as_str()).ok_or_else(|| {
                let names: Vec<&str> = sources.keys().map(String::as_str).collect();
                unknown_source(name, sources_list(&names))
            }),
            None => Ok(sources.get_index_of(MAIN_SOURCE).unwrap_or(0)),
        }
    }
}

fn open(
    name: &str,
    source: &mut dyn DataSource,
    params: &ConnectionParams,
) -> Result<(), GenerateError> {
    source.run(params).map_err(|source| GenerateError::OpenSource {
        name: name.to_string(),
        source,
    })
}

fn sources_list(names: &[&str]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

fn unknown_source(name: &str, available: String) -> GenerateError {
    GenerateError::UnknownSource {
        name: name.to_string(),
        available,
    }
}
