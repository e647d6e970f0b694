//! Demo dataset for local development and integration tests.

use serde_json::json;
use stafflane_core::{EntityKind, EntityRecord, Result};
use stafflane_db_memory::InMemoryStore;

pub async fn seed_demo_data(store: &InMemoryStore) -> Result<()> {
    for record in demo_records() {
        store.insert(record).await?;
    }
    Ok(())
}

fn demo_records() -> Vec<EntityRecord> {
    let mut records = Vec::new();

    let statuses = ["pending", "interviewing", "accepted", "rejected"];
    for i in 0..8 {
        let mut r = EntityRecord::new(format!("app-{i:02}"), EntityKind::Application);
        r.set_field("candidateName", json!(format!("Candidate {i:02}")));
        r.set_field("email", json!(format!("candidate{i:02}@example.com")));
        r.set_field("position", json!("Backend Developer"));
        r.set_field("status", json!(statuses[i % statuses.len()]));
        r.set_field("sectorId", json!("sec-01"));
        r.set_field("archived", json!(false));
        r.set_field(
            "interviews",
            json!([{ "id": format!("int-{i:02}"), "notes": "Phone screen done" }]),
        );
        r.set_field(
            "documents",
            json!([{ "id": format!("doc-{i:02}"), "fileName": format!("cv-{i:02}.pdf") }]),
        );
        r.set_field(
            "statusHistory",
            json!([{ "id": format!("hist-{i:02}"), "from": "new", "to": statuses[i % statuses.len()] }]),
        );
        records.push(r);
    }

    for (i, name) in ["Ada Byron", "Grace Hopper", "Alan Kay"].iter().enumerate() {
        let mut r = EntityRecord::new(format!("con-{i:02}"), EntityKind::Contact);
        r.set_field("fullName", json!(name));
        r.set_field("email", json!(format!("contact{i:02}@example.com")));
        r.set_field("topic", json!("general"));
        r.set_field("message", json!("Looking for engineering roles"));
        r.set_field("archived", json!(false));
        records.push(r);
    }

    for i in 0..4 {
        let mut r = EntityRecord::new(format!("art-{i:02}"), EntityKind::Article);
        r.set_field("title", json!(format!("Hiring market update {i:02}")));
        r.set_field("slug", json!(format!("hiring-market-update-{i:02}")));
        r.set_field("excerpt", json!("What changed this quarter"));
        r.set_field("body", json!("Full analysis of the hiring market."));
        r.set_field("published", json!(i % 2 == 0));
        r.set_field("publishedAt", json!(format!("2026-0{}-01T09:00:00Z", i + 1)));
        r.set_field(
            "tags",
            json!([{ "id": "tag-market", "name": "market", "slug": "market" }]),
        );
        r.set_field(
            "author",
            json!([{ "id": "tm-00", "name": "Ada Byron", "email": "ada@stafflane.example" }]),
        );
        r.set_field(
            "comments",
            json!([{ "id": format!("com-{i:02}"), "text": "Great read" }]),
        );
        records.push(r);
    }

    for (i, name) in ["Engineering", "Finance", "Healthcare"].iter().enumerate() {
        let mut r = EntityRecord::new(format!("sec-{i:02}"), EntityKind::Sector);
        r.set_field("name", json!(name));
        r.set_field("description", json!(format!("{name} placements")));
        r.set_field("active", json!(true));
        r.set_field(
            "positions",
            json!([{ "id": format!("pos-{i:02}"), "title": "Open role" }]),
        );
        records.push(r);
    }

    for i in 0..2 {
        let mut r = EntityRecord::new(format!("not-{i:02}"), EntityKind::Notice);
        r.set_field("title", json!(format!("Office notice {i:02}")));
        r.set_field("body", json!("We are closed on public holidays."));
        r.set_field("archived", json!(false));
        records.push(r);
    }

    for (i, (name, role)) in [("Ada Byron", "Director"), ("Alan Kay", "Consultant")]
        .iter()
        .enumerate()
    {
        let mut r = EntityRecord::new(format!("tm-{i:02}"), EntityKind::TeamMember);
        r.set_field("fullName", json!(name));
        r.set_field("role", json!(role));
        r.set_field("photoUrl", json!(format!("/static/team/{i:02}.jpg")));
        r.set_field("bio", json!("Long-time recruiter."));
        r.set_field("active", json!(true));
        r.set_field("sectors", json!([{ "id": "sec-00", "name": "Engineering" }]));
        records.push(r);
    }

    records
}
