//! Static general-knowledge facts loaded into an empty store

use claimcheck_domain::traits::EvidenceStore;
use claimcheck_domain::NewEvidence;
use tracing::info;

const SEED_FACTS: &[(&str, &str, &str)] = &[
    (
        "The Earth is approximately 4.54 billion years old, based on radiometric dating of meteorite material.",
        "https://www.nasa.gov/solar-system/earth/",
        "NASA - Earth Facts",
    ),
    (
        "The Earth is an oblate spheroid, not flat. This has been confirmed by satellite imagery, physics, and centuries of scientific observation.",
        "https://www.nasa.gov/solar-system/earth/",
        "NASA - Earth Shape",
    ),
    (
        "COVID-19 vaccines authorized by WHO have undergone rigorous clinical trials and have been shown to be safe and effective at preventing severe illness and death.",
        "https://www.who.int/emergencies/diseases/novel-coronavirus-2019/covid-19-vaccines",
        "WHO - COVID-19 Vaccine Safety",
    ),
    (
        "The Moon landing on July 20, 1969, by Apollo 11 astronauts Neil Armstrong and Buzz Aldrin is one of the most well-documented events in history, confirmed by independent sources worldwide.",
        "https://www.nasa.gov/mission_pages/apollo/apollo11.html",
        "NASA - Apollo 11 Mission",
    ),
    (
        "Climate change is primarily driven by human activities, especially the burning of fossil fuels, which increases greenhouse gas concentrations in the atmosphere. This is the scientific consensus supported by 97% of climate scientists.",
        "https://climate.nasa.gov/scientific-consensus/",
        "NASA - Scientific Consensus on Climate Change",
    ),
    (
        "5G technology uses radio waves and does not cause COVID-19 or other diseases. Radio waves in the 5G spectrum are non-ionizing and do not damage DNA or cells.",
        "https://www.who.int/news-room/questions-and-answers/item/radiation-5g-mobile-networks-and-health",
        "WHO - 5G and Health",
    ),
    (
        "Water fluoridation at recommended levels (0.7 mg/L) is safe and effective for preventing tooth decay, according to decades of research.",
        "https://www.cdc.gov/fluoridation/",
        "CDC - Community Water Fluoridation",
    ),
    (
        "The speed of light in a vacuum is approximately 299,792,458 meters per second. This is a fundamental constant of physics.",
        "https://www.nist.gov/si-redefinition/meter",
        "NIST - Speed of Light",
    ),
    (
        "India gained independence from British colonial rule on August 15, 1947. Jawaharlal Nehru became the first Prime Minister of independent India.",
        "https://www.britannica.com/place/India/Independence",
        "Britannica - Indian Independence",
    ),
    (
        "The United Nations was established on October 24, 1945, after World War II, with the aim of preventing future conflicts. It currently has 193 member states.",
        "https://www.un.org/en/about-us",
        "United Nations - About Us",
    ),
    (
        "Minecraft is a 3D sandbox game in which players explore a blocky, procedurally generated three-dimensional world.",
        "https://www.minecraft.net/en-us/about-minecraft",
        "Minecraft - About the Game",
    ),
];

/// The fixed seed set
pub fn seed_facts() -> Vec<NewEvidence> {
    SEED_FACTS
        .iter()
        .map(|(text, url, details)| NewEvidence::new(*text, *url).with_details(*details))
        .collect()
}

/// Insert the seed set if, and only if, the store is empty
///
/// Returns the number of documents inserted (0 when the store already had
/// content).
pub fn seed_if_empty<S: EvidenceStore>(store: &S) -> Result<usize, S::Error> {
    let existing = store.count()?;
    if existing > 0 {
        info!(existing, "Store already has documents, skipping seed");
        return Ok(0);
    }

    let ids = store.insert_batch(seed_facts())?;
    info!(seeded = ids.len(), "Seeded evidence store");
    Ok(ids.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_facts_are_well_formed() {
        let facts = seed_facts();
        assert_eq!(facts.len(), SEED_FACTS.len());
        for fact in facts {
            assert!(!fact.text.is_empty());
            assert!(fact.source_url.starts_with("https://"));
            assert!(!fact.details.is_empty());
        }
    }
}
