use colored::*;
use leadline_protocol::lead::format::{format_date, format_timestamp};
use leadline_protocol::lead::{FollowupStatus, LeadRecord, LeadReport, LeadTemperature};

pub fn print_lead_added(id: u64, name: &str) {
    println!("{} {} (id: {})", "✔ Lead added:".green().bold(), name.bold(), id);
}

pub fn print_success(message: &str) {
    println!("{} {}", "✔".green().bold(), message);
}

pub fn print_empty(message: &str) {
    println!("{}", message.dimmed());
}

fn added(record: &LeadRecord) -> String {
    record
        .created_at
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_else(|| "unknown".into())
}

fn temperature(record: &LeadRecord) -> ColoredString {
    match record.lead_temperature {
        LeadTemperature::Hot => "Hot".red().bold(),
        LeadTemperature::Cold => "Cold".blue(),
    }
}

pub fn print_lead(record: &LeadRecord) {
    println!(
        "{} {} - {} {}",
        format!("#{}", record.id).bold(),
        record.name.bold(),
        record.phone,
        format!("(added {})", added(record)).dimmed()
    );
    println!(
        "  {} | {} | {} | created by {}",
        temperature(record),
        record.lead_status,
        record.call_status,
        record.created_by
    );
    if let Some(email) = &record.email {
        println!("  Email: {email}");
    }
    if record.details_shared {
        println!("  Details shared");
    }
    if let Some(notes) = &record.notes {
        println!("  Notes: {notes}");
    }

    let followup = match record.followup_status {
        FollowupStatus::Completed => record.followup_status.to_string().green(),
        FollowupStatus::Pending => record.followup_status.to_string().yellow(),
        _ => record.followup_status.to_string().normal(),
    };
    let next = record
        .next_followup
        .as_ref()
        .map(format_date)
        .unwrap_or_else(|| "not scheduled".into());
    println!("  Follow-up: {followup}, next {next}");
    if let Some(last) = &record.last_followup {
        println!("  Last follow-up: {}", format_timestamp(last));
    }
    for entry in record.followup_notes.newest_first() {
        println!("    {}", entry.to_string().dimmed());
    }
}

pub fn print_trashed(record: &LeadRecord) {
    let deleted_at = record
        .deleted_at
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_default();
    println!(
        "{} {} - {} (deleted on {})",
        format!("#{}", record.id).bold(),
        record.name.bold(),
        record.phone,
        deleted_at
    );
    println!(
        "  Created by: {} | Deleted by: {}",
        record.created_by,
        record.deleted_by.as_deref().unwrap_or("unknown")
    );
    println!("  {} | {}", record.lead_status, record.call_status);
}

pub fn print_followup(record: &LeadRecord) {
    let next = record
        .next_followup
        .as_ref()
        .map(format_date)
        .unwrap_or_default();
    println!(
        "{} {} - {} due {} [{}]",
        format!("#{}", record.id).bold(),
        record.name.bold(),
        record.phone,
        next.yellow(),
        record.followup_status
    );
    if let Some(latest) = record.followup_notes.latest() {
        println!("  Last note: {}", latest.text);
    }
}

pub fn print_report(title: &str, report: &LeadReport) {
    println!("{}", title.bold().underline());
    println!("  Total leads:     {}", report.total_leads);
    println!("  Calls taken:     {}", report.calls_taken);
    println!("  Hot leads:       {}", report.hot_leads.to_string().red());
    println!("  Cold leads:      {}", report.cold_leads.to_string().blue());
    println!("  Details shared:  {}", report.details_shared);

    if !report.status_breakdown.is_empty() {
        println!("{}", "Lead status".bold());
        for (status, count) in &report.status_breakdown {
            println!("  {status:<16} {count}");
        }
    }
    if !report.call_status_breakdown.is_empty() {
        println!("{}", "Call status".bold());
        for (status, count) in &report.call_status_breakdown {
            println!("  {status:<16} {count}");
        }
    }
    if let Some(daily) = report.daily_leads.as_ref().filter(|daily| !daily.is_empty()) {
        println!("{}", "Leads per day".bold());
        for (day, count) in daily {
            println!("  {}  {}", format_date(day), "■".repeat(*count as usize).green());
        }
    }
}
