// Record store
//
// Static mapping from category to the flat file holding its text.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::category::Category;

/// Ordered, immutable mapping from [`Category`] to a file path.
///
/// Built once at startup. A category maps to at most one path; inserting
/// the same category twice keeps the later path in the first slot.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    entries: Vec<(Category, PathBuf)>,
}

impl RecordStore {
    /// Build from `(category, path)` pairs in configuration order
    pub fn new<I, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Category, P)>,
        P: Into<PathBuf>,
    {
        let mut store = Self::default();
        for (category, path) in entries {
            let path = path.into();
            match store.entries.iter_mut().find(|(c, _)| *c == category) {
                Some(slot) => slot.1 = path,
                None => store.entries.push((category, path)),
            }
        }
        store
    }

    /// Default layout: `<dir>/<category>.txt` for every category
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(
            Category::ALL
                .into_iter()
                .map(|c| (c, dir.join(format!("{}.txt", c.as_str())))),
        )
    }

    /// Build from config-style `name -> path` pairs, rejecting unknown names
    pub fn from_named(named: &BTreeMap<String, PathBuf>) -> Result<Self> {
        let entries = named
            .iter()
            .map(|(name, path)| {
                let category = name
                    .parse::<Category>()
                    .with_context(|| format!("Invalid [records] entry '{}'", name))?;
                Ok((category, path.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(entries))
    }

    pub fn path(&self, category: Category) -> Option<&Path> {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, p)| p.as_path())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &Path)> {
        self.entries.iter().map(|(c, p)| (*c, p.as_path()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_dir_covers_every_category() {
        let store = RecordStore::in_dir("/records");
        assert_eq!(store.len(), 3);
        assert_eq!(
            store.path(Category::LabRecord),
            Some(Path::new("/records/lab_record.txt"))
        );
    }

    #[test]
    fn test_duplicate_category_keeps_single_entry() {
        let store = RecordStore::new([
            (Category::LabRecord, "a.txt"),
            (Category::MedicalRecord, "m.txt"),
            (Category::LabRecord, "b.txt"),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.path(Category::LabRecord), Some(Path::new("b.txt")));
        let order: Vec<Category> = store.iter().map(|(c, _)| c).collect();
        assert_eq!(order, vec![Category::LabRecord, Category::MedicalRecord]);
    }

    #[test]
    fn test_from_named_rejects_unknown_name() {
        let mut named = BTreeMap::new();
        named.insert("lab_record".to_string(), PathBuf::from("lab.txt"));
        assert_eq!(RecordStore::from_named(&named).unwrap().len(), 1);

        named.insert("x_ray".to_string(), PathBuf::from("x.txt"));
        assert!(RecordStore::from_named(&named).is_err());
    }

    #[test]
    fn test_missing_category_has_no_path() {
        let store = RecordStore::new([(Category::ImageRecord, "img.txt")]);
        assert!(store.path(Category::LabRecord).is_none());
    }
}
