use tabled::Tabled;

use sitedesk_core::{Hub, TeamMember};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{print_output, render_list, yes_no};

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "Order")]
    order: i64,
    #[tabled(rename = "Active")]
    active: &'static str,
}

fn member_row(m: &TeamMember) -> MemberRow {
    MemberRow {
        id: m.id.to_string(),
        name: m.name.clone(),
        position: m.position_en.clone(),
        order: m.order_index,
        active: yes_no(m.is_active),
    }
}

pub async fn handle(hub: &Hub, global: &GlobalOpts) -> Result<(), CliError> {
    let team = hub.team();
    team.fetch_members().await?;
    let members: Vec<TeamMember> = team.members().iter().map(|m| (**m).clone()).collect();
    let out = render_list(global.output, &members, member_row)?;
    print_output(&out);
    Ok(())
}
