//! Command dispatch: every command enters a route first, then talks to
//! the hub and formats the result.

pub mod content;
pub mod schema;
pub mod session;
pub mod team;

use sitedesk_core::{Hub, LogicalEntity};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

pub async fn dispatch(
    cmd: Command,
    hub: &Hub,
    global: &GlobalOpts,
    email: Option<&str>,
) -> Result<(), CliError> {
    session::enter(hub, route_for(&cmd), email).await?;

    match cmd {
        Command::Schema => schema::handle(hub, global).await,
        Command::List { kind } => content::list(hub, kind, global).await,
        Command::Delete { kind, id } => content::delete(hub, kind, &id).await,
        Command::AddImages { kind, id, files } => content::add_images(hub, kind, &id, &files).await,
        Command::RemoveImage { kind, link_id } => content::remove_image(hub, kind, &link_id).await,
        Command::SetCover {
            project_id,
            image_id,
        } => content::set_cover(hub, &project_id, &image_id).await,
        Command::Team => team::handle(hub, global).await,
        Command::Whoami => session::whoami(hub),
    }
}

/// Admin page a command acts on.
fn route_for(cmd: &Command) -> &'static str {
    match cmd {
        Command::Schema | Command::Whoami => "/",
        Command::Team => "/about",
        Command::SetCover { .. } => kind_route(LogicalEntity::Project),
        Command::List { kind }
        | Command::Delete { kind, .. }
        | Command::AddImages { kind, .. }
        | Command::RemoveImage { kind, .. } => kind_route(*kind),
    }
}

fn kind_route(kind: LogicalEntity) -> &'static str {
    match kind {
        LogicalEntity::Hero => "/",
        LogicalEntity::Project => "/projects",
        LogicalEntity::Location => "/locations",
        LogicalEntity::Installation => "/installation",
        LogicalEntity::Timeline => "/timeline",
        LogicalEntity::About | LogicalEntity::SocialLink => "/about",
        LogicalEntity::SiteSection => "/features",
        LogicalEntity::WhyDifferent => "/why-we-different",
        LogicalEntity::Statistic => "/company-statistics",
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use sitedesk_core::View;
    use sitedesk_core::router::resolve;

    use super::*;

    #[test]
    fn every_kind_maps_to_a_known_page() {
        for kind in LogicalEntity::iter() {
            assert_ne!(resolve(kind_route(kind)).view, View::NotFound, "{kind}");
        }
    }
}
