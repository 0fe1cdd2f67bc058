use serde_json::{Map, Value};

/// Admin API collections the tools operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Posts,
    Pages,
    Tags,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Posts, Resource::Pages, Resource::Tags];

    /// Collection name, used both as URL segment and as payload key.
    pub fn collection(self) -> &'static str {
        match self {
            Resource::Posts => "posts",
            Resource::Pages => "pages",
            Resource::Tags => "tags",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            Resource::Posts => "post",
            Resource::Pages => "page",
            Resource::Tags => "tag",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Resource::Posts => "Post",
            Resource::Pages => "Page",
            Resource::Tags => "Tag",
        }
    }

    pub fn id_arg(self) -> &'static str {
        match self {
            Resource::Posts => "post_id",
            Resource::Pages => "page_id",
            Resource::Tags => "tag_id",
        }
    }

    /// Posts and pages carry HTML bodies that Ghost must convert on write.
    pub fn accepts_html(self) -> bool {
        matches!(self, Resource::Posts | Resource::Pages)
    }

    pub fn list_path(self) -> String {
        format!("{}/", self.collection())
    }

    pub fn item_path(self, id: &str) -> String {
        format!("{}/{}/", self.collection(), id)
    }

    pub fn create_path(self) -> String {
        if self.accepts_html() {
            format!("{}/?source=html", self.collection())
        } else {
            self.list_path()
        }
    }

    pub fn update_path(self, id: &str) -> String {
        if self.accepts_html() {
            format!("{}?source=html", self.item_path(id))
        } else {
            self.item_path(id)
        }
    }

    /// `{"posts": [entity]}`.
    pub fn wrap(self, entity: Map<String, Value>) -> Value {
        let mut body = Map::new();
        body.insert(
            self.collection().to_string(),
            Value::Array(vec![Value::Object(entity)]),
        );
        Value::Object(body)
    }

    pub fn first_entity(self, body: &Value) -> Option<&Map<String, Value>> {
        body.get(self.collection())?
            .as_array()?
            .first()?
            .as_object()
    }

    pub fn first_entity_mut(self, body: &mut Value) -> Option<&mut Map<String, Value>> {
        body.get_mut(self.collection())?
            .as_array_mut()?
            .first_mut()?
            .as_object_mut()
    }

    pub fn not_found_message(self, id: &str) -> String {
        format!("{} {} not found", self.label(), id)
    }

    pub fn deleted_message(self, id: &str) -> String {
        format!("{} {} deleted successfully", self.label(), id)
    }
}
