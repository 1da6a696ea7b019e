use tabled::Tabled;

use sitedesk_core::{Hub, ResolvedSchema};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{print_output, render_list};

#[derive(Tabled)]
struct SchemaRow {
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Base table")]
    base: String,
    #[tabled(rename = "Translations")]
    translations: String,
    #[tabled(rename = "Images")]
    images: String,
}

fn schema_row(r: &ResolvedSchema) -> SchemaRow {
    SchemaRow {
        kind: r.entity.to_string(),
        base: r.schema.base_table.clone(),
        translations: r
            .schema
            .translations
            .as_ref()
            .map_or_else(|| "-".into(), |t| format!("{} ({})", t.table, t.fk_column)),
        images: r
            .images
            .as_ref()
            .map_or_else(|| "-".into(), |i| format!("{} ({})", i.table, i.fk_column)),
    }
}

pub async fn handle(hub: &Hub, global: &GlobalOpts) -> Result<(), CliError> {
    let resolved = hub.probed_schemas().await?;
    let out = render_list(global.output, &resolved, schema_row)?;
    print_output(&out);
    Ok(())
}
