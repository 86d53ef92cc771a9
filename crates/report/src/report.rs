//! The report aggregate: page, bands and registries.

use crate::calculation::Calculation;
use crate::error::ReportError;
use crate::variable::{Parameter, Variable, VariableTable};
use banded_layout::{Drawable, LayoutError, NodeId, ObjectTree, Page, Position};
use banded_source::DataSource;
use banded_style::{FontRegistry, FontSpec};
use banded_types::FontId;
use indexmap::IndexMap;
use std::fmt;

/// The five fixed bands of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    /// Printed once, at the top of the first page.
    Title,
    /// Printed at the top of every page.
    Header,
    /// Printed once per data row.
    Body,
    /// Printed at the bottom of a page when a row overflows it, and after
    /// the last row.
    Footer,
    /// Printed once, after the last row.
    Summary,
}

impl Band {
    pub const ALL: [Band; 5] = [Band::Title, Band::Header, Band::Body, Band::Footer, Band::Summary];

    pub fn name(self) -> &'static str {
        match self {
            Band::Title => "title",
            Band::Header => "header",
            Band::Body => "body",
            Band::Footer => "footer",
            Band::Summary => "summary",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Sections {
    title: NodeId,
    header: NodeId,
    body: NodeId,
    footer: NodeId,
    summary: NodeId,
}

impl Sections {
    pub(crate) fn get(&self, band: Band) -> NodeId {
        match band {
            Band::Title => self.title,
            Band::Header => self.header,
            Band::Body => self.body,
            Band::Footer => self.footer,
            Band::Summary => self.summary,
        }
    }
}

/// A data break: a name, the expression whose change starts a new group,
/// and its own header and footer bands.
///
/// Groups are registered and laid out but pagination does not print them.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    name: String,
    expression: String,
    header: NodeId,
    footer: NodeId,
}

impl Group {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn header(&self) -> NodeId {
        self.header
    }

    pub fn footer(&self) -> NodeId {
        self.footer
    }
}

/// The root of a report definition.
///
/// Owns the object tree (whose root container is the page), the five bands,
/// the font, variable and parameter registries, the calculations, groups and
/// report-defined data sources.
pub struct Report {
    pub(crate) tree: ObjectTree,
    pub(crate) root: NodeId,
    pub(crate) sections: Sections,
    pub(crate) page: Page,
    pub(crate) fonts: FontRegistry,
    pub(crate) variables: VariableTable,
    pub(crate) parameters: VariableTable,
    pub(crate) calculations: Vec<Calculation>,
    pub(crate) groups: Vec<Group>,
    data_sources: IndexMap<String, Box<dyn DataSource>>,
}

impl Report {
    /// Creates an empty report: every band spans the page width and is
    /// zero millimetres tall.
    pub fn new(page: Page) -> Self {
        let (tree, root, [title, header, body, footer, summary]) =
            ObjectTree::with_bands(page.size(), Band::ALL.map(Band::name));
        let sections = Sections {
            title,
            header,
            body,
            footer,
            summary,
        };

        Self {
            tree,
            root,
            sections,
            page,
            fonts: FontRegistry::new(),
            variables: VariableTable::new(),
            parameters: VariableTable::new(),
            calculations: Vec::new(),
            groups: Vec::new(),
            data_sources: IndexMap::new(),
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Replaces the page. Fails, leaving the old page, if a band no longer
    /// fits.
    pub fn set_page(&mut self, page: Page) -> Result<(), LayoutError> {
        self.tree.set_size(self.root, page.size())?;
        self.page = page;
        Ok(())
    }

    pub fn tree(&self) -> &ObjectTree {
        &self.tree
    }

    /// Direct access to the object tree. Geometry changes made here are
    /// validated by the tree itself.
    pub fn tree_mut(&mut self) -> &mut ObjectTree {
        &mut self.tree
    }

    /// The container standing for the page; bands are its children.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn section(&self, band: Band) -> NodeId {
        self.sections.get(band)
    }

    pub fn band_height(&self, band: Band) -> f32 {
        self.tree.height(self.section(band))
    }

    pub fn set_band_height(&mut self, band: Band, height: f32) -> Result<(), LayoutError> {
        self.tree.set_height(self.section(band), height)
    }

    /// Moves `object` into the tree and places it inside `parent`.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        position: impl Into<Position>,
        object: Drawable,
    ) -> Result<NodeId, LayoutError> {
        let id = self.tree.insert(object);
        self.tree.add_child(parent, position, id)?;
        Ok(id)
    }

    /// Shorthand for adding `object` to one of the five bands.
    pub fn add_to_band(
        &mut self,
        band: Band,
        position: impl Into<Position>,
        object: Drawable,
    ) -> Result<NodeId, LayoutError> {
        self.add_child(self.section(band), position, object)
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    pub fn register_font(&mut self, spec: FontSpec) -> Result<FontId, ReportError> {
        Ok(self.fonts.register(spec)?)
    }

    pub fn add_variable(&mut self, variable: Variable) {
        self.variables.insert(variable);
    }

    pub fn variables(&self) -> &VariableTable {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut VariableTable {
        &mut self.variables
    }

    pub fn add_parameter(&mut self, parameter: Parameter) {
        self.parameters.insert(parameter.into_variable());
    }

    pub fn parameters(&self) -> &VariableTable {
        &self.parameters
    }

    /// Registers a calculation; calculations run in registration order.
    pub fn add_calculation(&mut self, calculation: Calculation) {
        self.calculations.push(calculation);
    }

    pub fn calculations(&self) -> &[Calculation] {
        &self.calculations
    }

    /// Resets every calculation to its start value.
    pub fn reset_calculations(&mut self) {
        self.calculations.iter_mut().for_each(Calculation::reset);
    }

    /// Declares a group with empty header and footer bands named
    /// `<name>_header` and `<name>_footer`.
    pub fn add_group(
        &mut self,
        name: impl Into<String>,
        expression: impl Into<String>,
    ) -> Result<&Group, LayoutError> {
        let name = name.into();
        let header = self.add_child(
            self.root,
            Position::origin(),
            Drawable::section(&format!("{}_header", name), (-1.0, 0.0)),
        )?;
        let footer = self.add_child(
            self.root,
            Position::origin(),
            Drawable::section(&format!("{}_footer", name), (-1.0, 0.0)),
        )?;
        self.groups.push(Group {
            name,
            expression: expression.into(),
            header,
            footer,
        });
        let index = self.groups.len() - 1;
        Ok(&self.groups[index])
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Registers a named data source. The source named `main` drives
    /// pagination when present.
    pub fn add_data_source(&mut self, name: impl Into<String>, source: Box<dyn DataSource>) {
        self.data_sources.insert(name.into(), source);
    }

    pub fn data_source_names(&self) -> impl Iterator<Item = &str> {
        self.data_sources.keys().map(String::as_str)
    }

    pub fn has_data_sources(&self) -> bool {
        !self.data_sources.is_empty()
    }

    /// Removes all data sources so they can be opened and read while the
    /// report itself is borrowed for processing.
    pub fn take_data_sources(&mut self) -> IndexMap<String, Box<dyn DataSource>> {
        std::mem::take(&mut self.data_sources)
    }

    pub fn restore_data_sources(&mut self, sources: IndexMap<String, Box<dyn DataSource>>) {
        self.data_sources = sources;
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new(Page::a4())
    }
}

impl fmt::Debug for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Report")
            .field("page", &self.page)
            .field("objects", &self.tree.len())
            .field("variables", &self.variables.len())
            .field("parameters", &self.parameters.len())
            .field("calculations", &self.calculations.len())
            .field("groups", &self.groups.len())
            .field("data_sources", &self.data_sources.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::VarType;
    use banded_types::ConfigError;

    #[test]
    fn test_new_report_has_five_empty_bands() {
        let report = Report::default();
        for band in Band::ALL {
            let id = report.section(band);
            assert_eq!(report.tree().parent(id), Some(report.root()));
            assert_eq!(report.tree().width(id), 210.0);
            assert_eq!(report.band_height(band), 0.0);
            assert_eq!(
                report.tree()[id].name().map(|n| n.as_str()),
                Some(band.name())
            );
        }
    }

    #[test]
    fn test_band_children_are_validated() {
        let mut report = Report::default();
        report.set_band_height(Band::Body, 5.0).unwrap();
        let ok = report.add_to_band(Band::Body, (0.0, 0.0), Drawable::text((30.0, 5.0), "row"));
        assert!(ok.is_ok());
        let too_tall =
            report.add_to_band(Band::Body, (0.0, 1.0), Drawable::text((30.0, 5.0), "row"));
        assert!(matches!(too_tall, Err(LayoutError::Containment { .. })));
        assert_eq!(report.tree().children(report.section(Band::Body)).len(), 1);
    }

    #[test]
    fn test_set_page_revalidates_bands() {
        let mut report = Report::default();
        report.set_band_height(Band::Title, 250.0).unwrap();
        let letter_half = Page::new((210.0, 140.0)).unwrap();
        assert!(report.set_page(letter_half).is_err());
        assert_eq!(report.page().height(), 297.0);
    }

    #[test]
    fn test_registries() {
        let mut report = Report::default();
        report.add_variable(Variable::new("total", VarType::Integer, 0));
        report.add_parameter(Parameter::new("title", VarType::String, "Sales"));
        let id = report
            .register_font(FontSpec::new("Times-Roman, Times", 12.0))
            .unwrap();
        assert_eq!(id.as_str(), "font_0");
        assert!(matches!(
            report.register_font(FontSpec::new("Courier", 9.0).with_id("font_0")),
            Err(ReportError::Config(ConfigError::DuplicateFont(_)))
        ));
        assert_eq!(report.variables().len(), 1);
        assert_eq!(report.parameters().value("title").map(|v| v.to_string()), Some("Sales".into()));

        let group = report.add_group("region", "row.region").unwrap();
        let header = group.header();
        assert_eq!(report.tree()[header].name().map(|n| n.as_str()), Some("region_header"));
    }
}
