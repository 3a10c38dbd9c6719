use crate::models::activity::ActivityCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityTemplate {
    pub title: &'static str,
    pub duration_minutes: u32,
}

const fn template(title: &'static str, duration_minutes: u32) -> ActivityTemplate {
    ActivityTemplate {
        title,
        duration_minutes,
    }
}

const TRANSPORTATION: &[ActivityTemplate] = &[
    template("Flight to destination", 300),
    template("Airport transfer", 60),
    template("Train journey", 240),
];

const ACCOMMODATION: &[ActivityTemplate] = &[
    template("Check-in at hotel", 30),
    template("Rest and relax", 120),
];

const ATTRACTION: &[ActivityTemplate] = &[
    template("Visit local museum", 120),
    template("Explore historic district", 180),
    template("National park hike", 240),
    template("Beach time", 180),
    template("Local market tour", 120),
];

const DINING: &[ActivityTemplate] = &[
    template("Breakfast at local cafe", 60),
    template("Lunch at famous restaurant", 90),
    template("Dinner with city views", 120),
];

const OTHER: &[ActivityTemplate] = &[
    template("Free time to explore", 120),
    template("Souvenir shopping", 60),
];

/// Order the slot filler draws categories in. Changing it changes every
/// generated itinerary.
pub const SELECTION_ORDER: [ActivityCategory; 5] = [
    ActivityCategory::Accommodation,
    ActivityCategory::Transportation,
    ActivityCategory::Attraction,
    ActivityCategory::Dining,
    ActivityCategory::Other,
];

/// Templates for a category. Every category has at least one.
pub fn templates_for(category: ActivityCategory) -> &'static [ActivityTemplate] {
    match category {
        ActivityCategory::Transportation => TRANSPORTATION,
        ActivityCategory::Accommodation => ACCOMMODATION,
        ActivityCategory::Attraction => ATTRACTION,
        ActivityCategory::Dining => DINING,
        ActivityCategory::Other => OTHER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_selectable_category_has_templates() {
        for category in SELECTION_ORDER {
            let templates = templates_for(category);
            assert!(
                (2..=5).contains(&templates.len()),
                "{:?} has {} templates",
                category,
                templates.len()
            );
            assert!(templates.iter().all(|t| t.duration_minutes > 0));
        }
    }

    #[test]
    fn test_selection_order_is_fixed() {
        assert_eq!(SELECTION_ORDER[0], ActivityCategory::Accommodation);
        assert_eq!(SELECTION_ORDER[1], ActivityCategory::Transportation);
        assert_eq!(SELECTION_ORDER[4], ActivityCategory::Other);
    }
}
