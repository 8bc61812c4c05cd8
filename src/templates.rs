use indexmap::IndexSet;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Hashtag};
use crate::utils::compact_tag;

/// Creative read-out of why a trend works.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreativeAnalysis {
    /// What makes the trend work.
    pub description: String,
    /// How to execute it well.
    pub content_strategy: String,
}

/// Step-by-step brief for creators joining a trend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreativeBrief {
    /// Ordered steps to film an entry.
    pub quick_steps: Vec<String>,
    /// Tips that lift performance.
    pub key_tips: Vec<String>,
    /// Common mistakes.
    pub avoid: Vec<String>,
}

/// Song fields substituted into template text.
///
/// Supported placeholders: `{song}`, `{artist}`, `{song_tag}` and
/// `{artist_tag}` (whitespace stripped, for hashtags).
#[derive(Clone, Debug)]
pub struct TemplateVars {
    /// Song title.
    pub song: String,
    /// Artist name.
    pub artist: String,
}

impl TemplateVars {
    /// Variables for `song` by `artist`.
    pub fn new(song: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            song: song.into(),
            artist: artist.into(),
        }
    }

    /// Substitute every placeholder in `text`.
    pub fn render(&self, text: &str) -> String {
        text.replace("{song_tag}", &compact_tag(&self.song))
            .replace("{artist_tag}", &compact_tag(&self.artist))
            .replace("{song}", &self.song)
            .replace("{artist}", &self.artist)
    }

    fn render_all(&self, lines: &[String]) -> Vec<String> {
        lines.iter().map(|line| self.render(line)).collect()
    }
}

/// Copy and tagging for one trend category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendTemplate {
    /// Category this template covers.
    pub category: CategoryId,
    /// Lower-case context words that suggest this category.
    pub keywords: Vec<String>,
    /// Content formats reported for the trend.
    pub content_types: Vec<String>,
    /// Trend name template.
    pub name: String,
    /// One-line summary template.
    pub summary: String,
    /// Description template.
    pub description: String,
    /// Analysis used when the research notes carry context.
    pub analysis: CreativeAnalysis,
    /// Brief used when the research notes carry context; `None` falls back to
    /// the catalog's generic brief.
    pub brief: Option<CreativeBrief>,
    /// Category hashtags when the notes carry context.
    pub hashtags: Vec<Hashtag>,
    /// Category hashtags when they do not.
    pub generic_hashtags: Vec<Hashtag>,
}

/// Data-driven template table keyed by trend category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateCatalog {
    /// Templates in suggestion and fallback order.
    pub templates: Vec<TrendTemplate>,
    /// Analysis used without context.
    pub generic_analysis: CreativeAnalysis,
    /// Brief used without context, or when a template has none.
    pub generic_brief: CreativeBrief,
    /// Platform tags appended after the song tags when context is present.
    pub context_hashtags: Vec<Hashtag>,
    /// Full base tag list used without context.
    pub generic_hashtags: Vec<Hashtag>,
    /// Captions picked for example videos.
    pub video_descriptions: Vec<String>,
}

impl TemplateCatalog {
    /// Whether the catalog has no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Template for `category`, ignoring ASCII case.
    pub fn get(&self, category: &str) -> Option<&TrendTemplate> {
        self.templates
            .iter()
            .find(|template| template.category.eq_ignore_ascii_case(category))
    }

    /// Template at `index`, wrapping around the catalog.
    pub fn by_index(&self, index: usize) -> Option<&TrendTemplate> {
        if self.templates.is_empty() {
            return None;
        }
        self.templates.get(index % self.templates.len())
    }

    /// Categories whose keywords appear in `context`, in catalog order.
    pub fn suggest_categories(&self, context: &str) -> IndexSet<CategoryId> {
        let context = context.to_lowercase();
        self.templates
            .iter()
            .filter(|template| {
                template
                    .keywords
                    .iter()
                    .any(|word| context.contains(&word.to_lowercase()))
            })
            .map(|template| template.category.clone())
            .collect()
    }

    /// Template for `category`, or the first template when none matches.
    pub fn resolve(&self, category: &str) -> Option<&TrendTemplate> {
        self.get(category).or_else(|| self.templates.first())
    }

    /// Rendered analysis: the template's with context, the generic one without.
    pub fn creative_analysis(
        &self,
        template: &TrendTemplate,
        has_context: bool,
        vars: &TemplateVars,
    ) -> CreativeAnalysis {
        let source = if has_context {
            &template.analysis
        } else {
            &self.generic_analysis
        };
        CreativeAnalysis {
            description: vars.render(&source.description),
            content_strategy: vars.render(&source.content_strategy),
        }
    }

    /// Rendered brief: the template's with context when it has one, else the generic one.
    pub fn creative_brief(
        &self,
        template: &TrendTemplate,
        has_context: bool,
        vars: &TemplateVars,
    ) -> CreativeBrief {
        let source = match (&template.brief, has_context) {
            (Some(brief), true) => brief,
            _ => &self.generic_brief,
        };
        CreativeBrief {
            quick_steps: vars.render_all(&source.quick_steps),
            key_tips: vars.render_all(&source.key_tips),
            avoid: vars.render_all(&source.avoid),
        }
    }

    /// Ordered, de-duplicated hashtag list for one trend.
    ///
    /// With context the list opens with hashtags found in the notes (or the
    /// song tag when there are none); without context it opens with the
    /// generic song/artist/platform tags. Affinity tags and the category tags
    /// follow.
    pub fn hashtags(
        &self,
        template: &TrendTemplate,
        vars: &TemplateVars,
        has_context: bool,
        research_hashtags: &IndexSet<Hashtag>,
        affinity_hashtags: &[Hashtag],
    ) -> Vec<Hashtag> {
        let mut tags: IndexSet<Hashtag> = IndexSet::new();
        if has_context {
            if research_hashtags.is_empty() {
                tags.insert(vars.render("#{song_tag}").to_lowercase());
            } else {
                tags.extend(research_hashtags.iter().cloned());
            }
            tags.extend(vars.render_all(&self.context_hashtags));
        } else {
            tags.extend(vars.render_all(&self.generic_hashtags));
        }
        tags.extend(affinity_hashtags.iter().cloned());
        let category_tags = if has_context {
            &template.hashtags
        } else {
            &template.generic_hashtags
        };
        tags.extend(vars.render_all(category_tags));
        tags.into_iter().collect()
    }

    /// Rendered caption for an example video.
    pub fn video_description<R: Rng + ?Sized>(&self, vars: &TemplateVars, rng: &mut R) -> String {
        self.video_descriptions
            .choose(rng)
            .map(|caption| vars.render(caption))
            .unwrap_or_else(|| vars.render("{song} #fyp"))
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn analysis(description: &str, content_strategy: &str) -> CreativeAnalysis {
    CreativeAnalysis {
        description: description.to_string(),
        content_strategy: content_strategy.to_string(),
    }
}

fn brief(quick_steps: &[&str], key_tips: &[&str], avoid: &[&str]) -> CreativeBrief {
    CreativeBrief {
        quick_steps: strings(quick_steps),
        key_tips: strings(key_tips),
        avoid: strings(avoid),
    }
}

fn dance_template() -> TrendTemplate {
    TrendTemplate {
        category: "dance".to_string(),
        keywords: strings(&["dance", "choreography", "moves"]),
        content_types: strings(&["dance", "lip sync", "music", "choreography"]),
        name: "Synchronized {song} Dance".to_string(),
        summary: "Dance moves synced to {song}.".to_string(),
        description: "Creators perform a shared routine to {song}, built around a few signature \
                      moves that land on the strongest beats. Solo dancers and groups keep the \
                      core steps and add their own styling on top."
            .to_string(),
        analysis: analysis(
            "The routine is anchored on one recognizable move at the chorus, which makes the \
             format easy to copy and easy to spot in a feed. Partner and group versions travel \
             furthest.",
            "Timing carries the format: set up during the intro, hit the signature move on the \
             first chorus, and save spins or lifts for the bridge. Expressive faces matter as \
             much as footwork.",
        ),
        brief: Some(brief(
            &[
                "Frame the full body at eye level with even light",
                "Rehearse the signature move against the first chorus",
                "Mirror your partner's footwork before adding flair",
            ],
            &[
                "Duo and group versions outperform solo takes",
                "Land the biggest move on the bridge",
                "Keep eye contact with the camera or partner",
            ],
            &["Stiff movements", "Looking at your feet", "Cropped framing"],
        )),
        hashtags: strings(&["#dance", "#duo", "#choreography"]),
        generic_hashtags: strings(&["#dance", "#choreography", "#dancechallenge"]),
    }
}

fn transformation_template() -> TrendTemplate {
    TrendTemplate {
        category: "transformation".to_string(),
        keywords: strings(&["transformation", "transition", "reveal", "before/after"]),
        content_types: strings(&["transformation", "fashion", "transition effects", "outfit change"]),
        name: "{song} Transformation Challenge".to_string(),
        summary: "Quick outfit changes timed to beat drops.".to_string(),
        description: "Creators use {song} to stage before/after reveals timed to a drop or an \
                      emotional peak. Outfit swaps, makeup looks and room makeovers are the common \
                      formats."
            .to_string(),
        analysis: analysis(
            "The build into the chorus gives a natural countdown, so the reveal feels earned. \
             Viewers stay to the end to see the payoff.",
            "Contrast is everything: keep the before state plain and make the after state bold. \
             Cut exactly on the drop and consider a second reveal on the final chorus.",
        ),
        brief: Some(brief(
            &[
                "Film the before look during the intro",
                "Cut to the reveal exactly on the first drop",
                "Make the after look as different as possible",
            ],
            &[
                "Hide the cut with a spin, swipe or hand cover",
                "A second reveal on the last chorus extends watch time",
                "Sell the confidence of the final look",
            ],
            &["Messy transitions", "A weak after look", "A reveal that misses the beat"],
        )),
        hashtags: strings(&["#transformation", "#glowup", "#beforeandafter"]),
        generic_hashtags: strings(&["#transformation", "#transition", "#beforeandafter"]),
    }
}

fn storytelling_template() -> TrendTemplate {
    TrendTemplate {
        category: "storytelling".to_string(),
        keywords: strings(&["pov", "story", "scenario", "relatable"]),
        content_types: strings(&["POV", "comedy", "storytelling", "acting", "skit"]),
        name: "POV {song} Stories".to_string(),
        summary: "POV scenarios with {song}.".to_string(),
        description: "A narrative trend that uses {song} as the backdrop for short POV scenes. \
                      Creators act out everyday or exaggerated situations and let expressions \
                      carry the story."
            .to_string(),
        analysis: analysis(
            "The lyrics supply a ready-made storyline, so creators only need a setup and a \
             payoff. Relatable situations drive shares and duets.",
            "Build tension with the verse and resolve it on the hook. Text overlays set the \
             scene in the first second so the joke lands without sound.",
        ),
        brief: Some(brief(
            &[
                "Write a one-line POV setup for the overlay",
                "Act out the turn of the story on the hook",
                "Finish on a clear reaction shot",
            ],
            &[
                "Keep the scenario instantly recognizable",
                "Let the story intensify with the music",
                "Use captions to carry context",
            ],
            &["Vague storylines", "Flat acting", "Poor lip sync"],
        )),
        hashtags: strings(&["#pov", "#storytime", "#romance"]),
        generic_hashtags: strings(&["#pov", "#storytime", "#relatable"]),
    }
}

fn lifestyle_template() -> TrendTemplate {
    TrendTemplate {
        category: "lifestyle".to_string(),
        keywords: strings(&["aesthetic", "vibe", "mood", "lifestyle"]),
        content_types: strings(&["lifestyle", "aesthetic", "vlog", "daily routine"]),
        name: "{song} Aesthetic Vibes".to_string(),
        summary: "Aesthetic vibes matching the song mood.".to_string(),
        description: "Creators pair {song} with aesthetic slices of daily life: morning \
                      routines, commutes, travel clips and quiet moments that match the song's \
                      tone."
            .to_string(),
        analysis: analysis(
            "The track sets a mood that viewers want to step into. Warm light and unhurried \
             shots make the clips feel personal.",
            "Shoot at golden hour where possible and save the best visual for the chorus. \
             Captions in a second language widen the audience.",
        ),
        brief: None,
        hashtags: strings(&["#aesthetic", "#goldenhour", "#vibes"]),
        generic_hashtags: strings(&["#aesthetic", "#vibes", "#lifestyle"]),
    }
}

fn challenge_template() -> TrendTemplate {
    TrendTemplate {
        category: "challenge".to_string(),
        keywords: strings(&["challenge", "trend"]),
        content_types: strings(&["challenge", "competition", "reaction", "attempt"]),
        name: "{song} Challenge".to_string(),
        summary: "Viral challenge using {song}.".to_string(),
        description: "A challenge format where creators interpret {song} under a shared \
                      constraint. Everyone adds a twist while keeping the elements that tie back \
                      to the original idea."
            .to_string(),
        analysis: analysis(
            "A simple core move with room for personal flair invites mass participation. \
             Family and group takes spread quickly.",
            "Hit the key timestamps for each move, then layer a personal twist on top. \
             Involving friends or family lifts engagement.",
        ),
        brief: None,
        hashtags: strings(&["#challenge", "#{song_tag}challenge"]),
        generic_hashtags: strings(&["#challenge", "#trend", "#attempt"]),
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self {
            templates: vec![
                dance_template(),
                transformation_template(),
                storytelling_template(),
                lifestyle_template(),
                challenge_template(),
            ],
            generic_analysis: analysis(
                "Creators act out everyday situations with exaggerated reactions timed to the \
                 audio cues.",
                "Relatability and comedic timing drive performance. The best clips use the audio \
                 to point at an experience viewers recognize instantly.",
            ),
            generic_brief: brief(
                &[
                    "Set up the phone at eye level with good lighting",
                    "Practice the audio timing (0:04, 0:08, 0:12)",
                    "Build emotional intensity throughout",
                ],
                &[
                    "Natural lighting works best",
                    "Film in 1080p minimum",
                    "Post 8-10 PM for best reach",
                ],
                &["Poor audio sync", "Overcomplicating", "Bad lighting"],
            ),
            context_hashtags: strings(&["#parati", "#fyp", "#viral"]),
            generic_hashtags: strings(&[
                "#{song_tag}",
                "#{artist_tag}",
                "#fyp",
                "#foryoupage",
                "#viral",
            ]),
            video_descriptions: strings(&[
                "Wait for it... #{song_tag} #viral #fyp",
                "POV: you finally get it #relatable",
                "{song} hits different #trend #foryou",
                "Nobody: ... Me: *does this* #{artist_tag}",
                "Which one are you? #challenge #viral",
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::DeterministicRng;

    fn vars() -> TemplateVars {
        TemplateVars::new("Golden Hour", "Sky Ferreira")
    }

    #[test]
    fn default_catalog_covers_every_category() {
        let catalog = TemplateCatalog::default();
        assert_eq!(catalog.len(), 5);
        for category in ["dance", "transformation", "storytelling", "lifestyle", "challenge"] {
            assert!(catalog.get(category).is_some(), "missing {category}");
        }
        assert_eq!(catalog.by_index(7).map(|t| t.category.as_str()), Some("storytelling"));
        assert_eq!(catalog.resolve("unknown").map(|t| t.category.as_str()), Some("dance"));
    }

    #[test]
    fn keywords_drive_category_suggestions() {
        let catalog = TemplateCatalog::default();
        let tags = catalog.suggest_categories("A POV story with a glow up REVEAL");
        let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["transformation", "storytelling"]);

        let mut custom = catalog.clone();
        custom.templates.retain(|template| template.category == "dance");
        custom.templates[0].category = "duet".to_string();
        custom.templates[0].keywords = vec!["side by side".to_string()];
        let tags = custom.suggest_categories("Fans film it side by side with a POV story");
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec!["duet".to_string()]);
        assert!(custom.suggest_categories("a dance routine").is_empty());
    }

    #[test]
    fn placeholders_render_song_and_tags() {
        let vars = vars();
        assert_eq!(vars.render("#{song_tag} by {artist}"), "#GoldenHour by Sky Ferreira");
        assert_eq!(vars.render("{song} / #{artist_tag}"), "Golden Hour / #SkyFerreira");
    }

    #[test]
    fn context_selects_category_specific_copy() {
        let catalog = TemplateCatalog::default();
        let dance = catalog.get("dance").unwrap();
        let with_context = catalog.creative_analysis(dance, true, &vars());
        let without = catalog.creative_analysis(dance, false, &vars());
        assert_eq!(with_context, dance.analysis);
        assert_eq!(without, catalog.generic_analysis);

        let lifestyle = catalog.get("lifestyle").unwrap();
        assert_eq!(catalog.creative_brief(lifestyle, true, &vars()), catalog.generic_brief);
        assert_eq!(catalog.creative_brief(dance, true, &vars()).avoid.len(), 3);
    }

    #[test]
    fn hashtags_are_ordered_and_deduplicated() {
        let catalog = TemplateCatalog::default();
        let challenge = catalog.get("challenge").unwrap();
        let research: IndexSet<Hashtag> = ["#goldenhour".to_string(), "#fyp".to_string()]
            .into_iter()
            .collect();
        let affinity = vec!["#corridos".to_string()];
        let tags = catalog.hashtags(challenge, &vars(), true, &research, &affinity);
        assert_eq!(tags[0], "#goldenhour");
        assert_eq!(tags.iter().filter(|tag| *tag == "#fyp").count(), 1);
        assert!(tags.contains(&"#corridos".to_string()));
        assert_eq!(tags.last().map(String::as_str), Some("#GoldenHourchallenge"));

        let generic = catalog.hashtags(challenge, &vars(), false, &IndexSet::new(), &[]);
        assert_eq!(generic[0], "#GoldenHour");
        assert_eq!(generic[1], "#SkyFerreira");
        assert!(generic.contains(&"#attempt".to_string()));
    }

    #[test]
    fn context_without_research_tags_leads_with_song_tag() {
        let catalog = TemplateCatalog::default();
        let dance = catalog.get("dance").unwrap();
        let tags = catalog.hashtags(dance, &vars(), true, &IndexSet::new(), &[]);
        assert_eq!(tags[0], "#goldenhour");
        assert_eq!(&tags[1..4], &["#parati", "#fyp", "#viral"]);
    }

    #[test]
    fn catalog_round_trips_through_json() {
        let catalog = TemplateCatalog::default();
        let json = serde_json::to_string(&catalog).unwrap();
        let restored: TemplateCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, catalog);
        let mut rng = DeterministicRng::new(8);
        assert!(!restored.video_description(&vars(), &mut rng).is_empty());
    }
}
