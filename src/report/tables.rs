// Static lookup tables for the chart report.
// Keyed by the Tamil names the backend uses in generated charts.

pub struct NakshatraInfo {
    pub tamil: &'static str,
    pub english: &'static str,
    pub deity: &'static str,
    pub qualities: &'static str,
}

pub struct RasiInfo {
    pub tamil: &'static str,
    pub english: &'static str,
    pub element: &'static str,
    pub ruler: &'static str,
}

pub struct YogaInfo {
    pub tamil: &'static str,
    pub english: &'static str,
    pub formation: &'static str,
}

pub struct DashaInfo {
    pub tamil: &'static str,
    pub english: &'static str,
    pub years: u8,
    pub prediction: &'static str,
}

const fn nakshatra(
    tamil: &'static str,
    english: &'static str,
    deity: &'static str,
    qualities: &'static str,
) -> NakshatraInfo {
    NakshatraInfo {
        tamil,
        english,
        deity,
        qualities,
    }
}

const fn rasi(
    tamil: &'static str,
    english: &'static str,
    element: &'static str,
    ruler: &'static str,
) -> RasiInfo {
    RasiInfo {
        tamil,
        english,
        element,
        ruler,
    }
}

pub static NAKSHATRAS: [NakshatraInfo; 27] = [
    nakshatra("அசுவினி", "Ashwini", "Ashwini Kumaras", "Swift, healing, pioneering"),
    nakshatra("பரணி", "Bharani", "Yama", "Disciplined, creative, intense"),
    nakshatra("கார்த்திகை", "Krittika", "Agni", "Sharp, purifying, determined"),
    nakshatra("ரோகிணி", "Rohini", "Brahma", "Artistic, nurturing, steady"),
    nakshatra("மிருகசீரிடம்", "Mrigashira", "Soma", "Curious, gentle, searching"),
    nakshatra("திருவாதிரை", "Ardra", "Rudra", "Analytical, transformative, bold"),
    nakshatra("புனர்பூசம்", "Punarvasu", "Aditi", "Generous, optimistic, renewing"),
    nakshatra("பூசம்", "Pushya", "Brihaspati", "Caring, devoted, prosperous"),
    nakshatra("ஆயில்யம்", "Ashlesha", "Nagas", "Perceptive, persuasive, guarded"),
    nakshatra("மகம்", "Magha", "Pitrs", "Regal, traditional, proud"),
    nakshatra("பூரம்", "Purva Phalguni", "Bhaga", "Warm, pleasure-loving, sociable"),
    nakshatra("உத்திரம்", "Uttara Phalguni", "Aryaman", "Reliable, helpful, principled"),
    nakshatra("அஸ்தம்", "Hasta", "Savitr", "Skilful, witty, industrious"),
    nakshatra("சித்திரை", "Chitra", "Vishvakarma", "Inventive, elegant, expressive"),
    nakshatra("சுவாதி", "Swati", "Vayu", "Independent, adaptable, diplomatic"),
    nakshatra("விசாகம்", "Vishakha", "Indra-Agni", "Ambitious, focused, resolute"),
    nakshatra("அனுஷம்", "Anuradha", "Mitra", "Loyal, cooperative, devoted"),
    nakshatra("கேட்டை", "Jyeshtha", "Indra", "Protective, resourceful, senior"),
    nakshatra("மூலம்", "Mula", "Nirrti", "Investigative, direct, uprooting"),
    nakshatra("பூராடம்", "Purva Ashadha", "Apas", "Confident, persuasive, invincible"),
    nakshatra("உத்திராடம்", "Uttara Ashadha", "Vishvedevas", "Righteous, enduring, victorious"),
    nakshatra("திருவோணம்", "Shravana", "Vishnu", "Attentive, learned, connecting"),
    nakshatra("அவிட்டம்", "Dhanishta", "Vasus", "Musical, wealthy, energetic"),
    nakshatra("சதயம்", "Shatabhisha", "Varuna", "Healing, secretive, scientific"),
    nakshatra("பூரட்டாதி", "Purva Bhadrapada", "Aja Ekapada", "Idealistic, passionate, austere"),
    nakshatra("உத்திரட்டாதி", "Uttara Bhadrapada", "Ahir Budhnya", "Wise, calm, compassionate"),
    nakshatra("ரேவதி", "Revati", "Pushan", "Kind, guiding, imaginative"),
];

pub static RASIS: [RasiInfo; 12] = [
    rasi("மேஷம்", "Mesham", "Fire", "Mars"),
    rasi("ரிஷபம்", "Rishabam", "Earth", "Venus"),
    rasi("மிதுனம்", "Mithunam", "Air", "Mercury"),
    rasi("கடகம்", "Kadagam", "Water", "Moon"),
    rasi("சிம்மம்", "Simmam", "Fire", "Sun"),
    rasi("கன்னி", "Kanni", "Earth", "Mercury"),
    rasi("துலாம்", "Thulam", "Air", "Venus"),
    rasi("விருச்சிகம்", "Viruchigam", "Water", "Mars"),
    rasi("தனுசு", "Dhanusu", "Fire", "Jupiter"),
    rasi("மகரம்", "Magaram", "Earth", "Saturn"),
    rasi("கும்பம்", "Kumbam", "Air", "Saturn"),
    rasi("மீனம்", "Meenam", "Water", "Jupiter"),
];

pub static YOGAS: [YogaInfo; 6] = [
    YogaInfo {
        tamil: "கஜகேசரி யோகம்",
        english: "Gajakesari Yoga",
        formation: "Jupiter in a kendra (1st, 4th, 7th or 10th) from the Moon.",
    },
    YogaInfo {
        tamil: "புத ஆதித்ய யோகம்",
        english: "Budhaditya Yoga",
        formation: "Sun and Mercury conjoined in the same house.",
    },
    YogaInfo {
        tamil: "சந்திர மங்கள யோகம்",
        english: "Chandra Mangala Yoga",
        formation: "Moon and Mars conjoined or in mutual aspect.",
    },
    YogaInfo {
        tamil: "ராஜ யோகம்",
        english: "Raja Yoga",
        formation: "Lords of a kendra and a trikona linked by conjunction, aspect or exchange.",
    },
    YogaInfo {
        tamil: "தன யோகம்",
        english: "Dhana Yoga",
        formation: "Lords of the 2nd, 5th, 9th or 11th houses associated together.",
    },
    YogaInfo {
        tamil: "நீச பங்க ராஜ யோகம்",
        english: "Neecha Bhanga Raja Yoga",
        formation: "A debilitated planet whose debilitation is cancelled by its dispositor's strength.",
    },
];

pub static DASHAS: [DashaInfo; 9] = [
    DashaInfo {
        tamil: "சூரியன்",
        english: "Sun",
        years: 6,
        prediction: "Recognition, authority and dealings with government; watch ego and health of the father.",
    },
    DashaInfo {
        tamil: "சந்திரன்",
        english: "Moon",
        years: 10,
        prediction: "Emotional growth, travel and family comfort; mind is sensitive to change.",
    },
    DashaInfo {
        tamil: "செவ்வாய்",
        english: "Mars",
        years: 7,
        prediction: "Energy, property and courage; avoid haste and disputes.",
    },
    DashaInfo {
        tamil: "புதன்",
        english: "Mercury",
        years: 17,
        prediction: "Learning, trade and communication flourish; good for education.",
    },
    DashaInfo {
        tamil: "குரு",
        english: "Jupiter",
        years: 16,
        prediction: "Wisdom, children and prosperity; favourable for marriage and growth.",
    },
    DashaInfo {
        tamil: "சுக்கிரன்",
        english: "Venus",
        years: 20,
        prediction: "Comforts, relationships, arts and vehicles; a period of enjoyment.",
    },
    DashaInfo {
        tamil: "சனி",
        english: "Saturn",
        years: 19,
        prediction: "Hard work rewarded slowly; discipline and patience bring lasting results.",
    },
    DashaInfo {
        tamil: "ராகு",
        english: "Rahu",
        years: 18,
        prediction: "Sudden changes, foreign links and ambition; stay grounded.",
    },
    DashaInfo {
        tamil: "கேது",
        english: "Ketu",
        years: 7,
        prediction: "Detachment, spirituality and research; material matters may feel uncertain.",
    },
];

fn matches(name: &str, tamil: &str, english: &str) -> bool {
    let name = name.trim();
    name == tamil || name.eq_ignore_ascii_case(english)
}

pub fn nakshatra_info(name: &str) -> Option<&'static NakshatraInfo> {
    NAKSHATRAS
        .iter()
        .find(|n| matches(name, n.tamil, n.english))
}

pub fn rasi_info(name: &str) -> Option<&'static RasiInfo> {
    RASIS.iter().find(|r| matches(name, r.tamil, r.english))
}

pub fn yoga_info(name: &str) -> Option<&'static YogaInfo> {
    YOGAS.iter().find(|y| matches(name, y.tamil, y.english))
}

pub fn dasha_info(planet: &str) -> Option<&'static DashaInfo> {
    DASHAS.iter().find(|d| matches(planet, d.tamil, d.english))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_tamil_and_english() {
        assert_eq!(nakshatra_info("ரோகிணி").unwrap().deity, "Brahma");
        assert_eq!(nakshatra_info("rohini").unwrap().tamil, "ரோகிணி");
        assert_eq!(rasi_info(" சிம்மம் ").unwrap().ruler, "Sun");
        assert_eq!(dasha_info("சனி").unwrap().years, 19);
        assert!(yoga_info("Gajakesari Yoga").is_some());
        assert!(rasi_info("Ophiuchus").is_none());
    }

    #[test]
    fn test_dasha_cycle_is_120_years() {
        let total: u32 = DASHAS.iter().map(|d| u32::from(d.years)).sum();
        assert_eq!(total, 120);
    }
}
