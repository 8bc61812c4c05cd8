/// Trend category label used to key templates and shape curves.
/// Examples: `dance`, `transformation`, `storytelling`
pub type CategoryId = String;
/// Two-letter region code as used by the region list.
/// Examples: `US`, `MX`, `KR`
pub type RegionCode = String;
/// Demographic bucket or archetype label inside a distribution map.
/// Examples: `18-24`, `female`, `Lifestyle`
pub type BucketLabel = String;
/// Hashtag including the leading `#`.
/// Example: `#fyp`
pub type Hashtag = String;
/// Mood keyword extracted from research notes.
/// Examples: `energetic`, `nostalgic`
pub type MoodKeyword = String;
/// Synthetic platform identifier rendered as a decimal string.
/// Example: `7512345678901234567`
pub type PlatformId = String;
