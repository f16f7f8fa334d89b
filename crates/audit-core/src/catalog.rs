//! The subject catalog: which subjects exist, which text fragments identify
//! them in a transcript, and which courses they belong to.
//!
//! A built-in catalog covers the rotor-wing training programme; a JSON file
//! with the same shape can replace it via `--catalog`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};

// ── SubjectEntry ──────────────────────────────────────────────────────────────

/// Catalog data for a single subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectEntry {
    /// Text fragments that identify this subject in transcript text.
    /// Matching is case-insensitive substring, per line.
    pub search_terms: Vec<String>,
    /// Courses this subject is a member of.
    pub courses: Vec<String>,
    /// Validity period in months, when the subject recurs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_months: Option<u32>,
}

// ── Catalog ───────────────────────────────────────────────────────────────────

/// The complete subject catalog, keyed by subject name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub subjects: BTreeMap<String, SubjectEntry>,
}

impl Catalog {
    /// Load a catalog from a JSON file.
    ///
    /// Returns [`AuditError::EmptyCatalog`] when the file parses but contains
    /// no subjects.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| AuditError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog: Catalog = serde_json::from_str(&content)?;
        if catalog.subjects.is_empty() {
            return Err(AuditError::EmptyCatalog(path.to_path_buf()));
        }
        Ok(catalog)
    }

    /// Number of subjects in the catalog.
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Whether the catalog contains no subjects.
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Derive the course membership map (course name → member subjects).
    ///
    /// This is the inverse of the per-subject `courses` lists.
    pub fn courses(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut map: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (subject, entry) in &self.subjects {
            for course in &entry.courses {
                map.entry(course.clone()).or_default().insert(subject.clone());
            }
        }
        map
    }

    /// The built-in rotor-wing training catalog.
    pub fn builtin() -> Self {
        let mut subjects = BTreeMap::new();

        let mut add = |name: &str, terms: &[&str], courses: &[&str], valid_months: Option<u32>| {
            subjects.insert(
                name.to_string(),
                SubjectEntry {
                    search_terms: terms.iter().map(|s| s.to_string()).collect(),
                    courses: courses.iter().map(|s| s.to_string()).collect(),
                    valid_months,
                },
            );
        };

        add(
            "ADS-B",
            &["ADS-B Overview", "ADS-B Exam"],
            &["Initial General Subjects Course", "Module 1"],
            None,
        );
        add(
            "Weather",
            &["Aviation Weather Theory", "Aviation Weather Theory Exam"],
            &["Initial General Subjects Course", "Module 1"],
            None,
        );
        add(
            "Aerodynamics",
            &["Helicopter Aerodynamics", "Helicopter Specific Exam"],
            &["Initial General Subjects Course", "Module 1"],
            None,
        );
        add(
            "Airspace",
            &["Airspace Overview", "Airspace Overview Exam"],
            &["Initial General Subjects Course", "Module 1"],
            None,
        );
        add(
            "Brownout",
            &["Flat-light, Whiteout, and Brownout Conditions"],
            &["Initial General Subjects Course", "Module 1"],
            None,
        );
        add(
            "CFIT",
            &[
                "Controlled Flight into Terrain Avoidance (CFIT, TAWS, and ALAR) - RW",
                "Controlled Flight into Terrain Avoidance RW Exam",
            ],
            &["Initial General Subjects Course", "Module 1"],
            None,
        );
        add(
            "Fire Classes",
            &[
                "Classes of Fire and Portable Fire Extinguishers",
                "Portable Fire Extinguisher Exam",
            ],
            &["Initial General Subjects Course", "Module 1"],
            None,
        );
        add(
            "GPS",
            &["GPS (RW IFR-VFR)", "GPS (RW IFR) Exam"],
            &["Initial General Subjects Course", "Module 1"],
            None,
        );
        add(
            "External Lighting",
            &["Helicopter External Lighting", "Helicopter External Lighting Exam"],
            &["Initial General Subjects Course", "Module 2"],
            None,
        );
        add(
            "METAR and TAF",
            &["METAR and TAF", "METAR and TAF Exam"],
            &["Initial General Subjects Course", "Module 2"],
            None,
        );
        add(
            "First Aid",
            &[
                "Physiology and First Aid (RW)",
                "Physiology and First Aid (RW) Exam",
            ],
            &["Initial General Subjects Course", "Module 2"],
            None,
        );
        add(
            "Runway Incursion",
            &["Survival", "Runway Incursion Exam"],
            &["Initial General Subjects Course", "Module 2"],
            None,
        );
        add(
            "Survival",
            &["Survival", "Survival Exam"],
            &["Initial General Subjects Course", "Module 2"],
            None,
        );
        add(
            "Traffic Advisory System",
            &["Traffic Advisory System (TAS)", "Traffic Advisory System"],
            &["Initial General Subjects Course", "Module 2"],
            None,
        );
        add(
            "Traffic Collision Avoidance System",
            &["Traffic Collision Avoidance System (TCASII)", "TCAS II - Exam"],
            &["Initial General Subjects Course", "Module 2"],
            None,
        );
        add(
            "Windshear",
            &["Windshear (RW)", "Helicopter Windshear Exam"],
            &["Initial General Subjects Course", "Module 2"],
            None,
        );
        add(
            "Wire Strike Prevention",
            &["Wire Strike Prevention", "Wire Strike Prevention Exam"],
            &["Wire Strike Prevention"],
            None,
        );
        add(
            "Basic Indoc",
            &[
                "The Helicopter and Jet Company - Indoc (NEW)",
                "The Helicopter Company - Indoc - SUPERCEDED",
                "THC - Indoc - EXAM",
            ],
            &["Basic Indoc"],
            None,
        );
        add(
            "SMS",
            &["The Helicopter and Jet Company - SMS", "THC - SMS Exam"],
            &["SMS"],
            Some(12),
        );
        add(
            "Hazmat",
            &["Hazmat - Will Not Carry", "Hazmat Will Not Carry Exam"],
            &["Dangerous Goods"],
            Some(24),
        );
        add(
            "CRM",
            &["CRM-ADM - Rotor Wing", "Crew Resource Management - Rotor Wing Exam"],
            &["CRM"],
            Some(12),
        );
        add(
            "AW139",
            &["AW-139", "AW-139 Examination"],
            &["AW139"],
            None,
        );
        add(
            "H145",
            &["H145 (EC-145T2)"],
            &["H145"],
            None,
        );

        Catalog { subjects }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_catalog_size() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 23);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_builtin_catalog_has_expected_subjects() {
        let catalog = Catalog::builtin();
        assert!(catalog.subjects.contains_key("Weather"));
        assert!(catalog.subjects.contains_key("AW139"));
        assert!(catalog.subjects.contains_key("Hazmat"));
    }

    #[test]
    fn test_builtin_recurrent_subjects_have_validity() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.subjects["SMS"].valid_months, Some(12));
        assert_eq!(catalog.subjects["Hazmat"].valid_months, Some(24));
        assert_eq!(catalog.subjects["Weather"].valid_months, None);
    }

    #[test]
    fn test_courses_inverse_mapping() {
        let catalog = Catalog::builtin();
        let courses = catalog.courses();

        let module1 = courses.get("Module 1").unwrap();
        assert!(module1.contains("Weather"));
        assert!(module1.contains("ADS-B"));
        assert_eq!(module1.len(), 8);

        // Single-subject courses.
        let aw139 = courses.get("AW139").unwrap();
        assert_eq!(aw139.len(), 1);
        assert!(aw139.contains("AW139"));
    }

    #[test]
    fn test_courses_subject_in_multiple_courses() {
        let catalog = Catalog::builtin();
        let courses = catalog.courses();
        // Weather belongs to both the initial course and Module 1.
        assert!(courses["Initial General Subjects Course"].contains("Weather"));
        assert!(courses["Module 1"].contains("Weather"));
    }

    #[test]
    fn test_load_from_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        let json = serde_json::json!({
            "subjects": {
                "Weather": {
                    "search_terms": ["Aviation Weather Theory"],
                    "courses": ["Module 1"],
                    "valid_months": 12
                }
            }
        });
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", json).unwrap();

        let catalog = Catalog::load_from(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.subjects["Weather"].valid_months, Some(12));
        assert_eq!(
            catalog.subjects["Weather"].search_terms,
            vec!["Aviation Weather Theory"]
        );
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = Catalog::load_from(Path::new("/does/not/exist.json")).unwrap_err();
        assert!(matches!(err, AuditError::FileRead { .. }));
    }

    #[test]
    fn test_load_from_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = Catalog::load_from(&path).unwrap_err();
        assert!(matches!(err, AuditError::JsonParse(_)));
    }

    #[test]
    fn test_load_from_empty_catalog() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, r#"{"subjects": {}}"#).unwrap();
        let err = Catalog::load_from(&path).unwrap_err();
        assert!(matches!(err, AuditError::EmptyCatalog(_)));
    }

    #[test]
    fn test_catalog_round_trips_through_json() {
        let catalog = Catalog::builtin();
        let json = serde_json::to_string(&catalog).unwrap();
        let back: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), catalog.len());
        assert_eq!(
            back.subjects["Hazmat"].valid_months,
            catalog.subjects["Hazmat"].valid_months
        );
    }
}
