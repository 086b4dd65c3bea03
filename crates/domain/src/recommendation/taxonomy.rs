use std::collections::BTreeMap;

use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use crate::Exercise;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Superiores,
    Inferiores,
    Core,
    Cardio,
    Funcional,
}

impl Category {
    /// Muscle-group labels covered by the category.
    #[must_use]
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            Category::Superiores => &["Peito", "Costas", "Ombros", "Bíceps", "Tríceps"],
            Category::Inferiores => &["Pernas", "Glúteos", "Panturrilha"],
            Category::Core => &["Abdômen", "Lombar"],
            Category::Cardio => &["Cardio", "HIIT", "Circuito"],
            Category::Funcional => &["Funcional", "Calistenia", "Cross Training"],
        }
    }
}

/// Immutable mapping from category keys to muscle-group labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    groups: BTreeMap<Category, &'static [&'static str]>,
}

impl Taxonomy {
    /// Labels for a category key. Keys are matched exactly; an unknown key has no labels.
    #[must_use]
    pub fn labels(&self, category: &str) -> &[&'static str] {
        category
            .parse::<Category>()
            .ok()
            .and_then(|c| self.groups.get(&c))
            .copied()
            .unwrap_or(&[])
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.groups.keys().copied()
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            groups: Category::iter().map(|c| (c, c.labels())).collect(),
        }
    }
}

/// Exercises whose type label contains one of the category's labels, in input order.
#[must_use]
pub fn filter_by_category<'a>(
    exercises: &'a [Exercise],
    taxonomy: &Taxonomy,
    category: &str,
) -> Vec<&'a Exercise> {
    let labels = taxonomy.labels(category);
    exercises.iter().filter(|e| e.matches_any(labels)).collect()
}
