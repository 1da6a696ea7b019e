// ── Content kinds ──
//
// Thin per-kind configuration for the generic store: row shapes, form
// inputs and a static descriptor. Kind-specific operations live as
// inherent impls on the store next to the kind.

mod about;
mod hero;
mod installation;
mod location;
mod project;
mod site_section;
mod social_link;
mod statistic;
mod timeline;
mod why_different;

pub use about::{About, AboutDraft, AboutPatch, AboutSection, AboutStore, AboutText};
pub use hero::{Hero, HeroSlide, HeroSlideDraft, HeroSlidePatch, HeroSlideText, HeroStore};
pub use installation::{
    Installation, InstallationDraft, InstallationPatch, InstallationStore, InstallationText,
    Installations,
};
pub use location::{Location, LocationDraft, LocationPatch, LocationStore, LocationText, Locations};
pub use project::{Project, ProjectDraft, ProjectPatch, ProjectStore, ProjectText, Projects};
pub use site_section::{
    SectionText, SiteSection, SiteSectionDraft, SiteSectionPatch, SiteSectionStore, SiteSections,
};
pub use social_link::{
    PLATFORM_ICONS, SocialLink, SocialLinkDraft, SocialLinkPatch, SocialLinkStore, SocialLinks,
    platform_icon,
};
pub use statistic::{CompanyStatistic, StatisticDraft, StatisticPatch, StatisticStore, Statistics};
pub use timeline::{Timeline, TimelineDraft, TimelineEvent, TimelinePatch, TimelineStore, TimelineText};
pub use why_different::{
    Differentiator, DifferentiatorDraft, DifferentiatorPatch, DifferentiatorText, WhyDifferent,
    WhyDifferentStore,
};

/// Link tables that can reference the same media asset as a section
/// background image.
pub(crate) const SHARED_IMAGE_TABLES: &[&str] = &["timeline_item_images", "site_section_images"];
