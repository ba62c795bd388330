//! query command - Build vacancy search parameters

use crate::cli::args::QueryArgs;
use crate::cli::Context;
use crate::core::loader::{load_area_resolver, load_metro_resolver};
use crate::core::query::{SearchFilters, VacancyQuery};
use crate::ui::output;
use anyhow::Result;

/// Build and print the query for the given form fields.
///
/// Reference data is loaded only for the fields that need it.
pub fn query(ctx: &Context, args: &QueryArgs) -> Result<()> {
    let filters = filters_from(args);

    let areas = match filters.area {
        Some(_) => Some(load_area_resolver(&ctx.config)?),
        None => None,
    };
    let metro = match filters.metro {
        Some(_) => Some(load_metro_resolver(&ctx.config)?),
        None => None,
    };

    let query = VacancyQuery::build(&filters, areas.as_ref(), metro.as_ref());
    tracing::debug!(params = query.params().len(), "built vacancy query");

    if ctx.json {
        output::print_json(&query)?;
        return Ok(());
    }
    for (key, value) in query.to_pairs() {
        println!("{}={}", key, value);
    }
    Ok(())
}

fn filters_from(args: &QueryArgs) -> SearchFilters {
    SearchFilters {
        page: args.page,
        per_page: args.per_page,
        text: args.text.clone(),
        experience: args.experience.clone(),
        employment_form: args.employment_form.clone(),
        work_format: args.work_format.clone(),
        schedule: args.schedule.clone(),
        area: args.area.clone(),
        metro: args.metro_station.clone(),
        salary: args.salary.clone(),
        currency: args.currency.clone(),
        education: args.education.clone(),
        only_with_salary: args.only_with_salary,
        premium: args.premium,
        responses_count_enabled: !args.no_responses_count,
        no_magic: !args.magic,
    }
}
