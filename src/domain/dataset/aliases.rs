use super::CanonicalField;

/// Lowercase header substrings per canonical field, in priority order.
///
/// The first alias that matches any header wins; within one alias the
/// leftmost header wins.
pub const FIELD_ALIASES: [(CanonicalField, &[&str]); 5] = [
    (
        CanonicalField::BusinessName,
        &[
            "advocate name",
            "name",
            "full name",
            "lawyer",
            "firm",
            "office",
            "company",
            "practice",
        ],
    ),
    (
        CanonicalField::OwnerName,
        &[
            "owner",
            "contact person",
            "principal",
            "proprietor",
            "head",
            "lead",
            "contact",
        ],
    ),
    (CanonicalField::City, &["city", "district", "town"]),
    (CanonicalField::State, &["state", "province", "region"]),
    (
        CanonicalField::MobileNumber,
        &[
            "mobile",
            "phone",
            "contact",
            "mobile number",
            "phone number",
            "cell",
            "whatsapp",
        ],
    ),
];
