//! Aggregation stage: weighted means for scalars, weighted voting for
//! colours and tags.

use std::collections::HashMap;

use super::weighting::WeightedContribution;
use crate::vibe::{
    BackgroundTone, ColorPalette, CssFilters, Lighting, VibeProfile, default_hue_rotate,
};

pub const MAX_MOOD_TAGS: usize = 8;
pub const MAX_AESTHETIC_TAGS: usize = 8;
pub const DOMINANT_COLORS: usize = 5;
pub const ACCENT_COLORS: usize = 3;
/// Number of top mood tags joined into the `mood` label.
pub const MOOD_LABEL_TAGS: usize = 3;

pub const FALLBACK_TEXTURE: &str = "smooth";
pub const FALLBACK_SONIC_MOOD: &str = "ambient, atmospheric";

/// Accumulated vote weight per distinct value, remembering first-seen order.
#[derive(Debug, Default)]
struct WeightedTally {
    order: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl WeightedTally {
    /// Adds `weight` once to every distinct value of one contribution.
    fn vote<'v, I>(&mut self, values: I, weight: f64)
    where
        I: IntoIterator<Item = &'v String>,
    {
        let mut seen_here: Vec<&str> = Vec::new();
        for value in values {
            if seen_here.contains(&value.as_str()) {
                continue;
            }
            seen_here.push(value);

            match self.index.get(value) {
                Some(&slot) => self.order[slot].1 += weight,
                None => {
                    self.index.insert(value.clone(), self.order.len());
                    self.order.push((value.clone(), weight));
                }
            }
        }
    }

    /// Values by descending weight; equal weights keep first-seen order.
    fn ranked(mut self) -> Vec<String> {
        // sort_by is stable
        self.order.sort_by(|a, b| b.1.total_cmp(&a.1));
        self.order.into_iter().map(|(value, _)| value).collect()
    }
}

/// Merges weighted contributions into one composite profile.
///
/// Returns `None` for an empty input. The result depends only on the set of
/// contributions: they are processed in item-id order whatever order they
/// arrive in, which also fixes tie-breaking and the representative texture.
pub fn merge_contributions(contributions: &[WeightedContribution<'_>]) -> Option<VibeProfile> {
    if contributions.is_empty() {
        return None;
    }

    let mut ordered: Vec<&WeightedContribution<'_>> = contributions.iter().collect();
    ordered.sort_by(|a, b| a.item_id.cmp(b.item_id));

    let total_weight: f64 = ordered.iter().map(|c| c.weight).sum();

    let mut warmth = 0.0;
    let mut contrast = 0.0;
    let mut saturation = 0.0;
    let mut filter_brightness = 0.0;
    let mut filter_contrast = 0.0;
    let mut filter_saturate = 0.0;
    let mut filter_sepia = 0.0;

    let mut colors = WeightedTally::default();
    let mut mood_tags = WeightedTally::default();
    let mut aesthetic_tags = WeightedTally::default();
    let mut texture: Option<&str> = None;
    let mut sonic_moods: Vec<&str> = Vec::new();

    for entry in &ordered {
        let vibe = entry.contribution;
        let weight = entry.weight;
        let w = weight / total_weight;

        warmth += vibe.warmth * w;
        contrast += vibe.contrast * w;
        saturation += vibe.saturation * w;
        filter_brightness += vibe.css_filters.brightness * w;
        filter_contrast += vibe.css_filters.contrast * w;
        filter_saturate += vibe.css_filters.saturate * w;
        filter_sepia += vibe.css_filters.sepia * w;

        colors.vote(&vibe.colors, weight);
        mood_tags.vote(&vibe.mood_tags, weight);
        aesthetic_tags.vote(&vibe.aesthetic_tags, weight);

        if texture.is_none() && !vibe.texture.trim().is_empty() {
            texture = Some(vibe.texture.as_str());
        }
        if let Some(sonic) = vibe.sonic_mood.as_deref().map(str::trim)
            && !sonic.is_empty()
            && !sonic_moods.contains(&sonic)
        {
            sonic_moods.push(sonic);
        }
    }

    let ranked_colors = colors.ranked();
    let dominant: Vec<String> = ranked_colors.iter().take(DOMINANT_COLORS).cloned().collect();
    let accent: Vec<String> = ranked_colors
        .iter()
        .skip(DOMINANT_COLORS)
        .take(ACCENT_COLORS)
        .cloned()
        .collect();

    let mut ranked_moods = mood_tags.ranked();
    ranked_moods.truncate(MAX_MOOD_TAGS);
    let mut ranked_aesthetics = aesthetic_tags.ranked();
    ranked_aesthetics.truncate(MAX_AESTHETIC_TAGS);

    let mood = ranked_moods
        .iter()
        .take(MOOD_LABEL_TAGS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let sonic_mood = if sonic_moods.is_empty() {
        FALLBACK_SONIC_MOOD.to_string()
    } else {
        sonic_moods.join(", ")
    };

    Some(VibeProfile {
        color_palette: ColorPalette {
            dominant,
            accent,
            background_tone: BackgroundTone::from_warmth(warmth),
        },
        mood,
        mood_tags: ranked_moods,
        lighting: Lighting { warmth, contrast },
        texture: texture.unwrap_or(FALLBACK_TEXTURE).to_string(),
        saturation,
        brightness: filter_brightness,
        aesthetic_tags: ranked_aesthetics,
        css_filters: CssFilters {
            brightness: filter_brightness,
            contrast: filter_contrast,
            saturate: filter_saturate,
            hue_rotate: default_hue_rotate(),
            sepia: filter_sepia,
        },
        sonic_mood,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vibe::VibeContribution;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn vibe(colors: &[&str], moods: &[&str]) -> VibeContribution {
        VibeContribution {
            colors: strings(colors),
            mood_tags: strings(moods),
            aesthetic_tags: vec![],
            warmth: 0.5,
            contrast: 0.5,
            saturation: 0.5,
            texture: String::new(),
            css_filters: CssFilters::default(),
            sonic_mood: None,
        }
    }

    fn weighted<'a>(id: &'a str, vibe: &'a VibeContribution, weight: f64) -> WeightedContribution<'a> {
        WeightedContribution {
            item_id: id,
            contribution: vibe,
            weight,
        }
    }

    #[test]
    fn test_empty_input_has_no_profile() {
        assert!(merge_contributions(&[]).is_none());
    }

    #[test]
    fn test_single_item_identity() {
        let mut solo = vibe(
            &["#0b132b", "#1c2541", "#3a506b", "#5bc0be", "#6fffe9", "#f4f4f4", "#222222"],
            &["wistful", "nocturnal", "hushed", "electric"],
        );
        solo.aesthetic_tags = strings(&["cyberpunk", "rain-soaked"]);
        solo.warmth = 0.23;
        solo.contrast = 0.87;
        solo.saturation = 0.61;
        solo.texture = "wet asphalt".into();
        solo.css_filters = CssFilters {
            brightness: 0.85,
            contrast: 1.3,
            saturate: 1.15,
            hue_rotate: "200deg".into(),
            sepia: 0.05,
        };
        solo.sonic_mood = Some("synthwave at 90bpm".into());

        // Any weight normalises to 1.0 against itself
        let profile = merge_contributions(&[weighted("solo", &solo, 0.0123)]).unwrap();

        assert_eq!(profile.lighting.warmth, 0.23);
        assert_eq!(profile.lighting.contrast, 0.87);
        assert_eq!(profile.saturation, 0.61);
        assert_eq!(profile.css_filters.brightness, 0.85);
        assert_eq!(profile.css_filters.contrast, 1.3);
        assert_eq!(profile.css_filters.saturate, 1.15);
        assert_eq!(profile.css_filters.sepia, 0.05);
        assert_eq!(profile.brightness, 0.85);

        assert_eq!(
            profile.color_palette.dominant,
            strings(&["#0b132b", "#1c2541", "#3a506b", "#5bc0be", "#6fffe9"])
        );
        assert_eq!(profile.color_palette.accent, strings(&["#f4f4f4", "#222222"]));
        assert_eq!(profile.mood_tags, solo.mood_tags);
        assert_eq!(profile.aesthetic_tags, solo.aesthetic_tags);
        assert_eq!(profile.mood, "wistful, nocturnal, hushed");
        assert_eq!(profile.texture, "wet asphalt");
        assert_eq!(profile.sonic_mood, "synthwave at 90bpm");
        assert_eq!(profile.color_palette.background_tone, BackgroundTone::Cool);
    }

    #[test]
    fn test_hue_rotate_is_not_aggregated() {
        let mut a = vibe(&["#111111"], &[]);
        a.css_filters.hue_rotate = "45deg".into();
        let profile = merge_contributions(&[weighted("a", &a, 1.0)]).unwrap();
        assert_eq!(profile.css_filters.hue_rotate, "0deg");
    }

    #[test]
    fn test_tag_truncation_keeps_top_eight_in_order() {
        // Tag k is carried by items 0..=(11 - k), so weights strictly descend
        let tags: Vec<String> = (0..12).map(|k| format!("tag-{k:02}")).collect();
        let vibes: Vec<VibeContribution> = (0..12)
            .map(|i| {
                let carried: Vec<&str> = tags[..12 - i].iter().map(String::as_str).collect();
                vibe(&["#000000"], &carried)
            })
            .collect();
        let ids: Vec<String> = (0..12).map(|i| format!("item-{i:02}")).collect();
        let input: Vec<WeightedContribution<'_>> = vibes
            .iter()
            .zip(&ids)
            .map(|(v, id)| weighted(id, v, 1.0))
            .collect();

        let profile = merge_contributions(&input).unwrap();
        assert_eq!(profile.mood_tags, tags[..8].to_vec());
        assert_eq!(profile.mood, "tag-00, tag-01, tag-02");
    }

    #[test]
    fn test_color_bucket_boundary() {
        // Eight colours, each on its own item with strictly descending weight
        let palette = [
            "#800000", "#8b4513", "#a0522d", "#cd853f", "#deb887", "#f5deb3", "#fff8dc", "#fffaf0",
        ];
        let vibes: Vec<VibeContribution> = palette.iter().map(|c| vibe(&[*c], &[])).collect();
        let ids: Vec<String> = (0..8).map(|i| format!("n{i}")).collect();
        let input: Vec<WeightedContribution<'_>> = vibes
            .iter()
            .zip(&ids)
            .enumerate()
            .map(|(rank, (v, id))| weighted(id, v, 1.0 / (rank as f64 + 1.0)))
            .collect();

        let profile = merge_contributions(&input).unwrap();
        assert_eq!(profile.color_palette.dominant, strings(&palette[..5]));
        assert_eq!(profile.color_palette.accent, strings(&palette[5..]));
        assert!(
            profile
                .color_palette
                .accent
                .iter()
                .all(|c| !profile.color_palette.dominant.contains(c))
        );
    }

    #[test]
    fn test_colors_beyond_eight_are_dropped() {
        let many: Vec<String> = (0..11).map(|i| format!("#0000{i:02}")).collect();
        let refs: Vec<&str> = many.iter().map(String::as_str).collect();
        let v = vibe(&refs, &[]);
        let profile = merge_contributions(&[weighted("a", &v, 1.0)]).unwrap();
        assert_eq!(profile.color_palette.dominant.len(), 5);
        assert_eq!(profile.color_palette.accent, strings(&refs[5..8]));
    }

    #[test]
    fn test_consensus_outvotes_single_strong_item() {
        let strong = vibe(&["#ff0000"], &["loud"]);
        let a = vibe(&["#00ff00"], &["quiet"]);
        let b = vibe(&["#00ff00"], &["quiet"]);
        let c = vibe(&["#00ff00"], &["quiet"]);
        let input = [
            weighted("strong", &strong, 0.5),
            weighted("a", &a, 0.2),
            weighted("b", &b, 0.2),
            weighted("c", &c, 0.2),
        ];
        let profile = merge_contributions(&input).unwrap();
        assert_eq!(profile.color_palette.dominant, strings(&["#00ff00", "#ff0000"]));
        assert_eq!(profile.mood_tags, strings(&["quiet", "loud"]));
    }

    #[test]
    fn test_value_counts_once_per_contribution() {
        let doubled = vibe(&["#abcdef", "#abcdef"], &["calm", "calm"]);
        let other = vibe(&["#123456"], &["tense"]);
        // Equal weights: a duplicate inside one item must not win the tie
        let input = [weighted("a", &other, 1.0), weighted("b", &doubled, 1.0)];
        let profile = merge_contributions(&input).unwrap();
        assert_eq!(profile.color_palette.dominant, strings(&["#123456", "#abcdef"]));
        assert_eq!(profile.mood_tags, strings(&["tense", "calm"]));
    }

    #[test]
    fn test_permutation_invariance() {
        let mut x = vibe(&["#111111", "#222222"], &["dreamy", "soft"]);
        x.warmth = 0.9;
        x.texture = "velvet".into();
        x.sonic_mood = Some("lo-fi".into());
        let mut y = vibe(&["#222222", "#333333"], &["soft", "stark"]);
        y.warmth = 0.1;
        y.texture = "concrete".into();
        y.sonic_mood = Some("industrial".into());
        let mut z = vibe(&["#333333", "#111111"], &["stark", "dreamy"]);
        z.warmth = 0.4;
        z.sonic_mood = Some("lo-fi".into());

        let forward = [
            weighted("x", &x, 0.3),
            weighted("y", &y, 0.3),
            weighted("z", &z, 0.3),
        ];
        let backward = [forward[2], forward[1], forward[0]];
        let shuffled = [forward[1], forward[2], forward[0]];

        let expected = merge_contributions(&forward).unwrap();
        assert_eq!(merge_contributions(&backward).unwrap(), expected);
        assert_eq!(merge_contributions(&shuffled).unwrap(), expected);
        assert_eq!(expected.texture, "velvet");
        assert_eq!(expected.sonic_mood, "lo-fi, industrial");
    }

    #[test]
    fn test_fallbacks_when_free_text_missing() {
        let mut a = vibe(&["#000000"], &[]);
        a.texture = "   ".into();
        a.sonic_mood = Some("".into());
        let profile = merge_contributions(&[weighted("a", &a, 1.0)]).unwrap();
        assert_eq!(profile.texture, FALLBACK_TEXTURE);
        assert_eq!(profile.sonic_mood, FALLBACK_SONIC_MOOD);
        assert_eq!(profile.mood, "");
    }

    #[test]
    fn test_weighted_mean_of_scalars() {
        let mut a = vibe(&["#000000"], &[]);
        a.saturation = 1.0;
        a.css_filters.sepia = 0.4;
        let mut b = vibe(&["#000000"], &[]);
        b.saturation = 0.0;
        b.css_filters.sepia = 0.0;
        // a carries three quarters of the weight
        let profile =
            merge_contributions(&[weighted("a", &a, 3.0), weighted("b", &b, 1.0)]).unwrap();
        assert!((profile.saturation - 0.75).abs() < 1e-12);
        assert!((profile.css_filters.sepia - 0.3).abs() < 1e-12);
    }
}
