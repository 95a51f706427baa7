//! Itinerary domain types
//!
//! The tree the planner generates and the enricher fills in:
//! Trip → Day → Section → Activity → ActivityOption. Field names serialize
//! as camelCase because that is the shape the model is instructed to emit,
//! and stored blobs round-trip through the same structs.

use serde::{Deserialize, Serialize};

/// Immutable input to trip generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    /// One or more destination cities
    pub destinations: Vec<String>,

    /// Spending tier
    pub budget: BudgetTier,

    /// Who is travelling
    pub travelers: TravelerType,

    /// Trip length in days
    pub days: u32,

    /// Pace from 0.0 (relaxed) to 1.0 (fast)
    pub pace: f32,

    /// Dietary requirements
    #[serde(default)]
    pub diet: Vec<DietOption>,

    /// Interest tags steering activity selection
    #[serde(default)]
    pub interests: Vec<Interest>,
}

impl TripRequest {
    /// Destinations as a display string
    pub fn destination_label(&self) -> String {
        self.destinations.join(", ")
    }

    /// Human label for the pace slider value
    pub fn pace_label(&self) -> &'static str {
        if self.pace < 0.35 {
            "relaxed"
        } else if self.pace <= 0.65 {
            "balanced"
        } else {
            "fast-paced"
        }
    }
}

impl Default for TripRequest {
    fn default() -> Self {
        Self {
            destinations: Vec::new(),
            budget: BudgetTier::MidRange,
            travelers: TravelerType::Solo,
            days: 3,
            pace: 0.5,
            diet: Vec::new(),
            interests: Vec::new(),
        }
    }
}

/// Spending tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetTier {
    Budget,
    #[default]
    MidRange,
    Luxury,
}

impl std::fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Budget => write!(f, "Budget"),
            Self::MidRange => write!(f, "Mid-range"),
            Self::Luxury => write!(f, "Luxury"),
        }
    }
}

impl std::str::FromStr for BudgetTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "budget" => Ok(Self::Budget),
            "mid-range" | "midrange" | "mid" => Ok(Self::MidRange),
            "luxury" => Ok(Self::Luxury),
            _ => Err(format!("Unknown budget tier: {}. Use: budget, mid-range, or luxury", s)),
        }
    }
}

/// Who is travelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelerType {
    #[default]
    Solo,
    Couple,
    Friends,
    Family,
}

impl std::fmt::Display for TravelerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Solo => write!(f, "Solo"),
            Self::Couple => write!(f, "Couple"),
            Self::Friends => write!(f, "Friends"),
            Self::Family => write!(f, "Family"),
        }
    }
}

impl std::str::FromStr for TravelerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "solo" => Ok(Self::Solo),
            "couple" => Ok(Self::Couple),
            "friends" => Ok(Self::Friends),
            "family" => Ok(Self::Family),
            _ => Err(format!(
                "Unknown traveler type: {}. Use: solo, couple, friends, or family",
                s
            )),
        }
    }
}

/// Interest tags steering activity selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interest {
    Art,
    History,
    Nature,
    Nightlife,
    Foodie,
}

impl std::fmt::Display for Interest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Art => write!(f, "Art"),
            Self::History => write!(f, "History"),
            Self::Nature => write!(f, "Nature"),
            Self::Nightlife => write!(f, "Nightlife"),
            Self::Foodie => write!(f, "Foodie"),
        }
    }
}

impl std::str::FromStr for Interest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "art" => Ok(Self::Art),
            "history" => Ok(Self::History),
            "nature" => Ok(Self::Nature),
            "nightlife" => Ok(Self::Nightlife),
            "foodie" | "food" => Ok(Self::Foodie),
            _ => Err(format!(
                "Unknown interest: {}. Use: art, history, nature, nightlife, or foodie",
                s
            )),
        }
    }
}

/// Dietary requirements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietOption {
    Vegetarian,
    Vegan,
    GlutenFree,
    Halal,
}

impl std::fmt::Display for DietOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vegetarian => write!(f, "Vegetarian"),
            Self::Vegan => write!(f, "Vegan"),
            Self::GlutenFree => write!(f, "Gluten-Free"),
            Self::Halal => write!(f, "Halal"),
        }
    }
}

impl std::str::FromStr for DietOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vegetarian" => Ok(Self::Vegetarian),
            "vegan" => Ok(Self::Vegan),
            "gluten-free" | "glutenfree" => Ok(Self::GlutenFree),
            "halal" => Ok(Self::Halal),
            _ => Err(format!(
                "Unknown diet option: {}. Use: vegetarian, vegan, gluten-free, or halal",
                s
            )),
        }
    }
}

/// A generated trip
///
/// The id is assigned locally after generation; the model never supplies it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    /// Unique identifier, empty until assigned
    #[serde(default)]
    pub id: String,

    /// Display name, e.g. "Tokyo Adventure"
    #[serde(alias = "name")]
    pub trip_name: String,

    /// Destination cities covered by the trip
    #[serde(default)]
    pub destinations: Vec<String>,

    /// One entry per day of the trip
    #[serde(default, alias = "dailyPlan")]
    pub days: Vec<Day>,
}

impl Trip {
    /// Destinations as a display string
    pub fn destination_label(&self) -> String {
        self.destinations.join(", ")
    }
}

/// One day of the itinerary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    /// 1-indexed day number
    #[serde(alias = "day")]
    pub day_number: u32,

    /// City this day takes place in
    #[serde(default)]
    pub city: String,

    /// Short narrative describing the day
    #[serde(default, alias = "summary")]
    pub narrative: String,

    /// Time-of-day sections in order
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// A time-of-day block within a day
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Label such as "Morning", "Afternoon", "Evening"
    #[serde(alias = "title")]
    pub time_of_day: String,

    /// Activities in visit order
    #[serde(default)]
    pub activities: Vec<Activity>,
}

/// A single itinerary entry
///
/// By convention an activity is either a single place (place fields set) or a
/// choice block (title + options), never both. Decoding accepts either shape;
/// nothing enforces the convention structurally. Coordinates and image URLs
/// are the only fields written after generation; the enricher fills them in
/// when missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Activity tag, wire name "type"
    #[serde(rename = "type")]
    pub kind: ActivityKind,

    /// Display time such as "09:00"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    /// Heading for choice blocks ("Dinner options")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Name of the place for single-place activities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_name: Option<String>,

    /// Filled by enrichment when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Rough time to spend, e.g. "2 hours"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<String>,

    /// Price estimate, e.g. "\u{20ac}15" or "Free"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    /// Local tip worth surfacing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insider_tip: Option<String>,

    /// Alternatives for choice blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<ActivityOption>>,

    /// Filled by enrichment when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Activity {
    /// Query string for image lookup: place name, falling back to title
    pub fn image_query(&self) -> Option<&str> {
        self.place_name.as_deref().or(self.title.as_deref())
    }
}

/// One alternative in a choice block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityOption {
    /// Name of the place
    pub name: String,

    /// Short tag like "Local favorite"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Price indicator, e.g. "$$"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_level: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Marked by the model as its pick
    #[serde(default)]
    pub recommended: bool,

    /// Filled by enrichment when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Geographic position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Activity tag
///
/// The model is asked for the canonical forms below but replies vary in case
/// and separators (SIGHTSEEING, food_option, Check-In). Parsing normalizes;
/// unrecognized tags are preserved as-is rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityKind {
    Sightseeing,
    Transport,
    CheckIn,
    FoodOption,
    HotelOption,
    Other(String),
}

impl ActivityKind {
    /// Parse a tag, tolerant of case and separator variants
    pub fn parse(s: &str) -> Self {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "sightseeing" => Self::Sightseeing,
            "transport" | "transportation" | "transfer" => Self::Transport,
            "checkin" => Self::CheckIn,
            "foodoption" | "food" => Self::FoodOption,
            "hoteloption" | "hotel" => Self::HotelOption,
            _ => Self::Other(s.to_string()),
        }
    }

    /// Canonical wire form
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sightseeing => "sightseeing",
            Self::Transport => "transport",
            Self::CheckIn => "check-in",
            Self::FoodOption => "food-option",
            Self::HotelOption => "hotel-option",
            Self::Other(s) => s,
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ActivityKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActivityKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_kind_parse_variants() {
        assert_eq!(ActivityKind::parse("sightseeing"), ActivityKind::Sightseeing);
        assert_eq!(ActivityKind::parse("SIGHTSEEING"), ActivityKind::Sightseeing);
        assert_eq!(ActivityKind::parse("food_option"), ActivityKind::FoodOption);
        assert_eq!(ActivityKind::parse("FOOD-OPTION"), ActivityKind::FoodOption);
        assert_eq!(ActivityKind::parse("Check-In"), ActivityKind::CheckIn);
        assert_eq!(ActivityKind::parse("HOTEL_OPTION"), ActivityKind::HotelOption);
        assert_eq!(ActivityKind::parse("transportation"), ActivityKind::Transport);
        assert_eq!(
            ActivityKind::parse("boat tour"),
            ActivityKind::Other("boat tour".to_string())
        );
    }

    #[test]
    fn test_activity_kind_roundtrip() {
        let kind = ActivityKind::FoodOption;
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, r#""food-option""#);
        let back: ActivityKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kind);
    }

    #[test]
    fn test_activity_decode_camel_case() {
        let json = r#"{
            "type": "sightseeing",
            "time": "09:00",
            "placeName": "Senso-ji Temple",
            "description": "Tokyo's oldest temple",
            "estimatedDuration": "2 hours",
            "price": "Free",
            "insiderTip": "Go before 8am to beat the crowds"
        }"#;
        let activity: Activity = serde_json::from_str(json).unwrap();
        assert_eq!(activity.kind, ActivityKind::Sightseeing);
        assert_eq!(activity.place_name.as_deref(), Some("Senso-ji Temple"));
        assert_eq!(activity.insider_tip.as_deref(), Some("Go before 8am to beat the crowds"));
        assert!(activity.coordinates.is_none());
        assert!(activity.options.is_none());
    }

    #[test]
    fn test_activity_decode_ignores_unknown_keys() {
        let json = r#"{"type": "transport", "placeName": "Narita Express", "somethingNew": 42}"#;
        let activity: Activity = serde_json::from_str(json).unwrap();
        assert_eq!(activity.kind, ActivityKind::Transport);
    }

    #[test]
    fn test_choice_block_decode() {
        let json = r#"{
            "type": "food-option",
            "title": "Dinner options",
            "options": [
                {"name": "Ichiran Ramen", "priceLevel": "$", "recommended": true},
                {"name": "Sushi Dai", "tag": "Local favorite"}
            ]
        }"#;
        let activity: Activity = serde_json::from_str(json).unwrap();
        let options = activity.options.unwrap();
        assert_eq!(options.len(), 2);
        assert!(options[0].recommended);
        assert_eq!(options[0].price_level.as_deref(), Some("$"));
        assert!(!options[1].recommended);
    }

    #[test]
    fn test_trip_decode_with_aliases() {
        let json = r#"{
            "tripName": "Tokyo Adventure",
            "dailyPlan": [
                {"day": 1, "city": "Tokyo", "summary": "Arrival day", "sections": []}
            ]
        }"#;
        let trip: Trip = serde_json::from_str(json).unwrap();
        assert_eq!(trip.trip_name, "Tokyo Adventure");
        assert_eq!(trip.days.len(), 1);
        assert_eq!(trip.days[0].day_number, 1);
        assert_eq!(trip.days[0].narrative, "Arrival day");
        assert!(trip.id.is_empty());
    }

    #[test]
    fn test_trip_serialize_skips_empty_optionals() {
        let trip = Trip {
            id: "abc".to_string(),
            trip_name: "Kyoto".to_string(),
            destinations: vec!["Kyoto".to_string()],
            days: vec![Day {
                day_number: 1,
                city: "Kyoto".to_string(),
                narrative: String::new(),
                sections: vec![Section {
                    time_of_day: "Morning".to_string(),
                    activities: vec![Activity {
                        kind: ActivityKind::Sightseeing,
                        time: None,
                        title: None,
                        place_name: Some("Fushimi Inari".to_string()),
                        coordinates: None,
                        description: None,
                        estimated_duration: None,
                        price: None,
                        insider_tip: None,
                        options: None,
                        image_url: None,
                    }],
                }],
            }],
        };
        let json = serde_json::to_string(&trip).unwrap();
        assert!(json.contains(r#""placeName":"Fushimi Inari""#));
        assert!(!json.contains("imageUrl"));
        assert!(!json.contains("insiderTip"));
    }

    #[test]
    fn test_image_query_falls_back_to_title() {
        let mut activity = Activity {
            kind: ActivityKind::FoodOption,
            time: None,
            title: Some("Dinner options".to_string()),
            place_name: None,
            coordinates: None,
            description: None,
            estimated_duration: None,
            price: None,
            insider_tip: None,
            options: None,
            image_url: None,
        };
        assert_eq!(activity.image_query(), Some("Dinner options"));

        activity.place_name = Some("Ichiran".to_string());
        assert_eq!(activity.image_query(), Some("Ichiran"));
    }

    #[test]
    fn test_budget_tier_from_str() {
        assert_eq!("mid-range".parse::<BudgetTier>().unwrap(), BudgetTier::MidRange);
        assert_eq!("LUXURY".parse::<BudgetTier>().unwrap(), BudgetTier::Luxury);
        assert!("platinum".parse::<BudgetTier>().is_err());
    }

    #[test]
    fn test_pace_labels() {
        let mut request = TripRequest {
            pace: 0.1,
            ..Default::default()
        };
        assert_eq!(request.pace_label(), "relaxed");
        request.pace = 0.5;
        assert_eq!(request.pace_label(), "balanced");
        request.pace = 0.9;
        assert_eq!(request.pace_label(), "fast-paced");
    }
}
