//! Built-in resource descriptors for the company site backend.

use crate::form::{Draft, DraftValue, FileField, Rule};
use crate::models::{Capabilities, ListShape, Resource};

fn text() -> DraftValue {
    DraftValue::text("")
}

fn file() -> DraftValue {
    DraftValue::Null
}

fn top_files(names: &[&str]) -> Vec<FileField> {
    names.iter().map(|n| FileField::top(n)).collect()
}

fn required(names: &[&str]) -> Vec<Rule> {
    names.iter().map(|n| Rule::required(n)).collect()
}

pub fn team() -> Resource {
    Resource::new(
        "team",
        "Team Member",
        Draft::new([
            ("name", text()),
            ("jobTitle", text()),
            ("image", file()),
            ("facebook", text()),
            ("instagram", text()),
            ("linkedin", text()),
        ]),
    )
    .with_files(top_files(&["image"]))
    .with_rules(required(&["name", "jobTitle"]))
}

pub fn service() -> Resource {
    Resource::new(
        "service",
        "Service",
        Draft::new([
            ("title", text()),
            ("description", text()),
            ("image", file()),
            ("subservice", DraftValue::list([])),
        ]),
    )
    .with_files(top_files(&["image"]))
    .with_rules(required(&["title", "description"]))
    .with_deep_search()
}

pub fn project() -> Resource {
    Resource::new(
        "project",
        "Project",
        Draft::new([
            ("title", text()),
            ("description", text()),
            ("overview", text()),
            ("image", file()),
            ("benefits", DraftValue::list([])),
        ]),
    )
    .with_files(top_files(&["image"]))
    .with_rules(required(&["title", "description"]))
}

pub fn blog() -> Resource {
    Resource::new(
        "blog",
        "Blog",
        Draft::new([
            ("title", text()),
            ("description", text()),
            ("descriptionHtml", text()),
            ("overview", text()),
            ("image1", file()),
            ("image2", file()),
            ("image3", file()),
            ("link1", text()),
            ("link2", text()),
            ("tag1", text()),
            ("tag2", text()),
            ("tag3", text()),
            ("tag4", text()),
        ]),
    )
    .with_list_shape(ListShape::DataEnvelope)
    .with_files(top_files(&["image1", "image2", "image3"]))
    .with_rules(required(&["title", "description", "overview"]))
    .with_summary("description", 100)
}

pub fn faq() -> Resource {
    Resource::new(
        "faq",
        "FAQ",
        Draft::new([
            ("title", text()),
            ("img", file()),
            (
                "qa",
                DraftValue::list([DraftValue::object([("question", text()), ("answer", text())])]),
            ),
        ]),
    )
    .with_capabilities(Capabilities::CREATE_UPDATE)
    .with_files(top_files(&["img"]))
    .with_rules(required(&["title"]))
    .with_deep_search()
}

pub fn achievement() -> Resource {
    Resource::new(
        "achievement",
        "Achievement",
        Draft::new([
            ("icons", file()),
            ("title", text()),
            ("number", DraftValue::from(0_i64)),
        ]),
    )
    .with_files(top_files(&["icons"]))
    .with_rules(required(&["title"]))
}

pub fn career() -> Resource {
    Resource::new(
        "career",
        "Career",
        Draft::new([
            ("title", text()),
            ("department", text()),
            ("location", text()),
            ("description", text()),
            ("requirements", DraftValue::list([text()])),
        ]),
    )
    .with_rules({
        let mut rules = required(&["title", "department", "location", "description"]);
        rules.push(Rule::non_empty_list("requirements"));
        rules
    })
    .with_deep_search()
}

pub fn career_applicant() -> Resource {
    Resource::new("career-applicant", "Application", Draft::default())
        .with_capabilities(Capabilities::READ_ONLY)
}

pub fn contact() -> Resource {
    Resource::new(
        "contact",
        "Contact",
        Draft::new([
            ("address", text()),
            ("email", text()),
            ("phone1", text()),
            ("phone2", text()),
            ("phone3", text()),
            ("telegram", text()),
            ("twitter", text()),
            ("location", text()),
            ("facebook", text()),
            ("linkedin", text()),
        ]),
    )
    .with_capabilities(Capabilities::CREATE_UPDATE)
    .with_rules(required(&["email"]))
}

pub fn contact_us() -> Resource {
    Resource::new("contact-us", "Message", Draft::default())
        .with_capabilities(Capabilities::READ_DELETE)
        .with_summary("message", 100)
}

pub fn consultation() -> Resource {
    Resource::new("consultation", "Consultation", Draft::default())
        .with_capabilities(Capabilities::READ_DELETE)
        .with_summary("description", 100)
}

pub fn info() -> Resource {
    Resource::new(
        "info",
        "Info",
        Draft::new([
            ("image1", file()),
            ("image2", file()),
            ("image3", file()),
            ("image4", file()),
            ("companyProfile", text()),
            ("howWeWork", text()),
            ("whyChooseUs", text()),
        ]),
    )
    .with_files(top_files(&["image1", "image2", "image3", "image4"]))
}

pub fn video() -> Resource {
    Resource::new("video", "Video", Draft::new([("videoLink", text())]))
        .with_rules(required(&["videoLink"]))
}

pub fn why_choose_us() -> Resource {
    Resource::new(
        "why-choose-us",
        "Why Choose Us",
        Draft::new([
            ("title", text()),
            ("subtitle", text()),
            ("img", file()),
            (
                "exp",
                DraftValue::list([DraftValue::object([
                    ("icon", file()),
                    ("title", text()),
                    ("description", text()),
                ])]),
            ),
        ]),
    )
    .with_capabilities(Capabilities::READ_UPDATE)
    .with_files(vec![
        FileField::top("img"),
        FileField::in_list_as("exp", "icon", "exp_icon"),
    ])
    .with_deep_search()
}

pub fn about() -> Resource {
    let mission = || {
        DraftValue::object([("icon", file()), ("title", text()), ("description", text())])
    };
    Resource::new(
        "about",
        "About",
        Draft::new([
            ("title", text()),
            ("description", text()),
            ("clientNo", text()),
            ("homeImg", file()),
            ("aboutImg1", file()),
            ("aboutImg2", file()),
            ("mission", DraftValue::list([mission(), mission()])),
            ("service", DraftValue::list([text(), text(), text()])),
        ]),
    )
    .with_capabilities(Capabilities::READ_UPDATE)
    .with_files({
        let mut files = top_files(&["homeImg", "aboutImg1", "aboutImg2"]);
        files.push(FileField::in_list("mission", "icon"));
        files
    })
    .with_deep_search()
}

pub fn who_we_are() -> Resource {
    Resource::new(
        "who-we-are",
        "Who We Are",
        Draft::new([
            (
                "whoWeAre",
                DraftValue::object([("description1", text()), ("description2", text())]),
            ),
            ("ourMission", DraftValue::object([("description", text())])),
            ("ourVision", DraftValue::object([("description", text())])),
            ("img", DraftValue::list([])),
        ]),
    )
    .with_capabilities(Capabilities::READ_UPDATE)
    .with_files(vec![FileField::files("img")])
    .with_deep_search()
}

pub fn our_goal() -> Resource {
    Resource::new(
        "our-goal",
        "Our Goal",
        Draft::new([("goals", DraftValue::list([]))]),
    )
    .with_capabilities(Capabilities::READ_UPDATE)
    .with_deep_search()
}

/// Every known resource, in menu order.
pub fn all() -> Vec<Resource> {
    vec![
        team(),
        service(),
        project(),
        blog(),
        faq(),
        achievement(),
        career(),
        career_applicant(),
        contact(),
        contact_us(),
        consultation(),
        info(),
        video(),
        why_choose_us(),
        about(),
        who_we_are(),
        our_goal(),
    ]
}

pub fn find(name: &str) -> Option<Resource> {
    all().into_iter().find(|r| r.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{validate, FieldPath};
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let resources = all();
        let names: HashSet<_> = resources.iter().map(|r| r.name).collect();
        assert_eq!(names.len(), resources.len());
    }

    #[test]
    fn test_find() {
        let blog = find("blog").unwrap();
        assert_eq!(blog.list_shape, ListShape::DataEnvelope);
        assert_eq!(blog.summary, Some(("description", 100)));
        assert!(find("nope").is_none());
    }

    #[test]
    fn test_inbound_resources_are_read_delete() {
        for name in ["contact-us", "consultation"] {
            assert_eq!(find(name).unwrap().capabilities, Capabilities::READ_DELETE);
        }
    }

    #[test]
    fn test_applications_and_contact_cannot_be_deleted() {
        assert_eq!(career_applicant().capabilities, Capabilities::READ_ONLY);
        assert_eq!(contact().capabilities, Capabilities::CREATE_UPDATE);
    }

    #[test]
    fn test_upload_part_names() {
        let icon = FieldPath::field("exp").index(0).key("icon");
        let why = why_choose_us();
        assert_eq!(
            why.file_fields.iter().find_map(|f| f.part_name(&icon)),
            Some("exp_icon".to_string())
        );

        let img = FieldPath::field("img").index(1);
        let who = who_we_are();
        assert_eq!(
            who.file_fields.iter().find_map(|f| f.part_name(&img)),
            Some("img".to_string())
        );
    }

    #[test]
    fn test_career_needs_a_requirement() {
        let career = career();
        let draft = ["title", "department", "location", "description"]
            .iter()
            .fold(career.template.clone(), |d, f| {
                d.set_field(&FieldPath::field(*f), "x".into()).unwrap()
            });

        let err = validate(&draft, &career.rules).unwrap_err();
        assert_eq!(err.user_message(), "At least one requirements entry is needed");

        let draft = draft
            .set_field(&FieldPath::field("requirements").index(0), "Rust".into())
            .unwrap();
        assert!(validate(&draft, &career.rules).is_ok());
    }

    #[test]
    fn test_templates_hold_every_file_field() {
        for resource in all() {
            for field in &resource.file_fields {
                let name = field.field();
                assert!(
                    resource.template.field(name).is_some(),
                    "{} is missing {}",
                    resource.name,
                    name
                );
            }
        }
    }
}
