//! Grouping of written outputs by measurement category.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::naming::Channel;

/// Measurement category used for comparison plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// RX spectrum analyzer path loss (`SG*_RX*`).
    Rx,
    /// TX spectrum analyzer path loss (`*_NF_SPEC`).
    NfSpec,
    /// TX power meter path loss (`*_NF_OSC`).
    NfOsc,
}

impl Category {
    /// Categories in plotting order.
    pub const ALL: [Category; 3] = [Category::Rx, Category::NfSpec, Category::NfOsc];

    pub fn name(self) -> &'static str {
        match self {
            Category::Rx => "RX",
            Category::NfSpec => "NF_SPEC",
            Category::NfOsc => "NF_OSC",
        }
    }

    /// Output files that belong on this category's comparison plot.
    ///
    /// This is a fixed set covering all channels, whether or not the files
    /// were produced by the current run.
    pub fn expected_outputs(self) -> Vec<String> {
        Channel::ALL
            .iter()
            .map(|c| match self {
                Category::Rx => format!("SG1_RX{}.txt", c),
                Category::NfSpec => format!("TX{}_NF_SPEC.txt", c),
                Category::NfOsc => format!("TX{}_NF_OSC.txt", c),
            })
            .collect()
    }

    /// File name of the comparison plot.
    pub fn plot_file_name(self) -> String {
        format!("{}_comparison.png", self.name())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn is_rx(file_name: &str) -> bool {
    file_name.contains(Category::Rx.name())
}

fn is_nf_spec(file_name: &str) -> bool {
    file_name.contains(Category::NfSpec.name())
}

fn is_nf_osc(file_name: &str) -> bool {
    file_name.contains(Category::NfOsc.name())
}

/// Classification rules, checked in order; the first match wins.
pub const CATEGORY_RULES: [(Category, fn(&str) -> bool); 3] = [
    (Category::Rx, is_rx),
    (Category::NfSpec, is_nf_spec),
    (Category::NfOsc, is_nf_osc),
];

/// Category of an output file name, if any.
pub fn classify(file_name: &str) -> Option<Category> {
    CATEGORY_RULES
        .iter()
        .find(|(_, matches)| matches(file_name))
        .map(|&(category, _)| category)
}

/// Written output paths, grouped by category.
#[derive(Debug, Clone)]
pub struct FileGroups {
    groups: Vec<(Category, Vec<PathBuf>)>,
}

impl FileGroups {
    /// Empty groups for every category.
    pub fn new() -> Self {
        Self {
            groups: Category::ALL
                .iter()
                .map(|&c| (c, Vec::with_capacity(16)))
                .collect(),
        }
    }

    /// Record a written output. Returns the category it was filed under, or
    /// `None` if the file name matches no category.
    pub fn record(&mut self, path: &Path) -> Option<Category> {
        let name = path.file_name()?.to_str()?;
        let category = classify(name)?;

        if let Some((_, paths)) = self.groups.iter_mut().find(|(c, _)| *c == category) {
            paths.push(path.to_path_buf());
        }
        Some(category)
    }

    /// Paths recorded under `category`.
    pub fn get(&self, category: Category) -> &[PathBuf] {
        self.groups
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, paths)| paths.as_slice())
            .unwrap_or(&[])
    }

    /// Categories in plotting order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.groups.iter().map(|(c, _)| *c)
    }

    /// Total number of grouped paths.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, paths)| paths.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FileGroups {
    fn default() -> Self {
        Self::new()
    }
}
