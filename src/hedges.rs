//! Validated methodology filters ("hedges") and the framework-to-hedge
//! default mapping.
//!
//! Each hedge is a citeable boolean fragment that favors one study
//! methodology. The built-in library ships one per methodology type;
//! hosts can construct their own library from remote config.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HedgeType {
    Therapy,
    Qualitative,
    Etiology,
    Prognosis,
    Diagnosis,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hedge {
    pub id: String,
    #[serde(rename = "type")]
    pub hedge_type: HedgeType,
    pub fragment: String,
    pub source: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HedgeLibrary {
    hedges: Vec<Hedge>,
}

static BUILTIN: Lazy<HedgeLibrary> = Lazy::new(|| {
    HedgeLibrary::new(vec![
        Hedge {
            id: "cochrane-therapy".to_string(),
            hedge_type: HedgeType::Therapy,
            fragment: "randomized controlled trial[pt] OR controlled clinical trial[pt] \
                       OR randomized[tiab] OR placebo[tiab] OR randomly[tiab] OR trial[ti]"
                .to_string(),
            source: "Cochrane Highly Sensitive Search Strategy for identifying randomized \
                     trials in MEDLINE (2008 revision), sensitivity-maximizing version"
                .to_string(),
        },
        Hedge {
            id: "wong-qualitative".to_string(),
            hedge_type: HedgeType::Qualitative,
            fragment: "qualitative[tiab] OR interview[tiab] OR focus group[tiab] \
                       OR ethnography[tiab] OR grounded theory[tiab] OR phenomenology[tiab]"
                .to_string(),
            source: "Wong SS, Wilczynski NL, Haynes RB. Developing optimal search strategies \
                     for detecting clinically relevant qualitative studies in MEDLINE (2004)"
                .to_string(),
        },
        Hedge {
            id: "cq-etiology".to_string(),
            hedge_type: HedgeType::Etiology,
            fragment: "risk[tiab] OR odds ratio[tiab] OR relative risk[tiab] \
                       OR cohort studies[Mesh] OR case-control studies[Mesh]"
                .to_string(),
            source: "PubMed Clinical Queries etiology filter, broad version \
                     (Haynes RB et al.)"
                .to_string(),
        },
        Hedge {
            id: "cq-prognosis".to_string(),
            hedge_type: HedgeType::Prognosis,
            fragment: "prognosis[tiab] OR cohort studies[Mesh] OR follow-up studies[Mesh] \
                       OR predict[tiab] OR course[tiab]"
                .to_string(),
            source: "PubMed Clinical Queries prognosis filter, broad version \
                     (Haynes RB et al.)"
                .to_string(),
        },
        Hedge {
            id: "cq-diagnosis".to_string(),
            hedge_type: HedgeType::Diagnosis,
            fragment: "sensitivity[tiab] OR specificity[tiab] OR predictive value[tiab] \
                       OR diagnostic accuracy[tiab]"
                .to_string(),
            source: "PubMed Clinical Queries diagnosis filter, broad version \
                     (Haynes RB et al.)"
                .to_string(),
        },
    ])
});

impl HedgeLibrary {
    pub fn new(hedges: Vec<Hedge>) -> Self {
        Self { hedges }
    }

    /// The built-in validated set.
    pub fn builtin() -> &'static HedgeLibrary {
        &BUILTIN
    }

    pub fn get(&self, id: &str) -> Option<&Hedge> {
        self.hedges.iter().find(|h| h.id == id)
    }

    /// First hedge of the given methodology type.
    pub fn by_type(&self, hedge_type: HedgeType) -> Option<&Hedge> {
        self.hedges.iter().find(|h| h.hedge_type == hedge_type)
    }

    pub fn hedges(&self) -> &[Hedge] {
        &self.hedges
    }
}

/// Which methodology a research framework defaults to. Unmapped
/// frameworks fall back to therapy.
pub fn default_hedge_type(framework: &str) -> HedgeType {
    match framework.to_ascii_uppercase().as_str() {
        "PICO" | "COCOPOP" => HedgeType::Therapy,
        "PEO" => HedgeType::Etiology,
        "SPIDER" | "SPICE" | "ECLIPSE" => HedgeType::Qualitative,
        "FINER" => HedgeType::Prognosis,
        _ => HedgeType::Therapy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_type() {
        let lib = HedgeLibrary::builtin();
        for t in [
            HedgeType::Therapy,
            HedgeType::Qualitative,
            HedgeType::Etiology,
            HedgeType::Prognosis,
            HedgeType::Diagnosis,
        ] {
            let hedge = lib.by_type(t).unwrap();
            assert!(!hedge.fragment.is_empty());
            assert!(!hedge.source.is_empty());
        }
    }

    #[test]
    fn framework_mapping() {
        assert_eq!(default_hedge_type("PICO"), HedgeType::Therapy);
        assert_eq!(default_hedge_type("CoCoPop"), HedgeType::Therapy);
        assert_eq!(default_hedge_type("PEO"), HedgeType::Etiology);
        assert_eq!(default_hedge_type("SPIDER"), HedgeType::Qualitative);
        assert_eq!(default_hedge_type("spice"), HedgeType::Qualitative);
        assert_eq!(default_hedge_type("ECLIPSE"), HedgeType::Qualitative);
        assert_eq!(default_hedge_type("FINER"), HedgeType::Prognosis);
        assert_eq!(default_hedge_type("PCC"), HedgeType::Therapy);
    }

    #[test]
    fn lookup_by_id() {
        let lib = HedgeLibrary::builtin();
        assert!(lib.get("cochrane-therapy").is_some());
        assert!(lib.get("nonexistent").is_none());
    }
}
