diesel::table! {
    documents (collection, id) {
        collection -> Text,
        id -> Text,
        body -> Text,
        created_at -> Timestamp,
    }
}
