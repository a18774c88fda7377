use dataobject_core::{
    DataObjectError, DataObjects, DeclaredType, PropertyDescriptor, TypeKey, TypeSchema, Value,
};
use serde_json::json;

struct Invoice;

impl DeclaredType for Invoice {
    const TYPE_NAME: &'static str = "billing::Invoice";

    fn schema() -> TypeSchema {
        TypeSchema::new(Self::TYPE_NAME)
            .property("number", TypeKey::STRING)
            .property("issuedAt", TypeKey::DATE)
            .array("lines", InvoiceLine::TYPE_NAME)
    }
}

struct InvoiceLine;

impl DeclaredType for InvoiceLine {
    const TYPE_NAME: &'static str = "billing::InvoiceLine";

    fn schema() -> TypeSchema {
        TypeSchema::new(Self::TYPE_NAME)
            .property("sku", TypeKey::STRING)
            .property("quantity", TypeKey::NUMBER)
    }
}

struct TreeNode;

impl DeclaredType for TreeNode {
    const TYPE_NAME: &'static str = "TreeNode";

    fn schema() -> TypeSchema {
        TypeSchema::new(Self::TYPE_NAME)
            .property("label", TypeKey::STRING)
            .array("children", Self::TYPE_NAME)
    }
}

#[test]
fn declared_types_attach_their_schemas() {
    let mut objects = DataObjects::new();
    objects.declare::<Invoice>().expect("invoice should declare");
    objects.declare::<InvoiceLine>().expect("line should declare");

    assert!(objects.has_properties(&Invoice::type_key()));
    assert_eq!(
        objects.get_properties(&Invoice::type_key()),
        Invoice::schema().properties()
    );
    assert_eq!(
        objects.declared_types(),
        vec![Invoice::type_key(), InvoiceLine::type_key()]
    );
}

#[test]
fn declaration_order_does_not_matter_for_nested_types() {
    let mut objects = DataObjects::new();
    objects.declare::<Invoice>().expect("invoice should declare");
    objects.declare::<InvoiceLine>().expect("line should declare");

    let invoice = objects
        .from_json(
            &Invoice::type_key(),
            &json!({
                "number": "INV-7",
                "issuedAt": "2024-03-01",
                "lines": [{ "sku": "A", "quantity": 2 }, { "sku": "B", "quantity": 1 }]
            }),
        )
        .expect("invoice should build");

    let lines = invoice
        .field("lines")
        .as_array()
        .expect("lines should be an array");
    assert_eq!(lines[0].type_key(), &InvoiceLine::type_key());
    assert_eq!(lines[0].field("quantity"), &Value::from(2));
}

#[test]
fn recursive_type_declarations_are_supported() {
    let mut objects = DataObjects::new();
    objects.declare::<TreeNode>().expect("tree node should declare");

    let tree = objects
        .from_json(
            &TreeNode::type_key(),
            &json!({
                "label": "root",
                "children": [
                    { "label": "left", "children": [{ "label": "leaf" }] },
                    { "label": "right", "children": [] }
                ]
            }),
        )
        .expect("tree should build");

    let copy = objects.clone_value(&tree).expect("tree should clone");
    assert!(objects.equals(&copy, &tree).expect("trees compare"));

    let leaf = &copy.field("children").as_array().expect("children")[0]
        .field("children")
        .as_array()
        .expect("grandchildren")[0];
    assert_eq!(leaf.field("label"), &Value::from("leaf"));
    assert!(leaf.field("children").is_null());

    let pruned = objects
        .from_json(
            &TreeNode::type_key(),
            &json!({
                "label": "root",
                "children": [
                    { "label": "left", "children": [] },
                    { "label": "right", "children": [] }
                ]
            }),
        )
        .expect("tree should build");
    assert!(!objects.equals(&pruned, &tree).expect("trees compare"));
}

#[test]
fn schema_documents_declare_types() {
    let mut objects = DataObjects::new();
    let schema = TypeSchema::from_json(&json!({
        "type": "Profile",
        "properties": [
            { "name": "handle", "type": "String" },
            { "name": "joined", "type": "Date" },
            { "name": "aliases", "type": "String", "is_array": true }
        ]
    }))
    .expect("schema document should load");
    objects.declare_schema(schema).expect("profile should declare");

    let profile = objects
        .from_json(
            &TypeKey::new("Profile"),
            &json!({ "handle": "@a", "joined": 0, "aliases": ["b", "c"] }),
        )
        .expect("profile should build");
    assert_eq!(
        profile.field("joined").as_date().and_then(|date| date.millis()),
        Some(0)
    );
    assert_eq!(profile.field("aliases").as_array().map(<[Value]>::len), Some(2));
}

#[test]
fn invalid_schema_is_rejected_before_attachment() {
    let mut objects = DataObjects::new();
    let err = objects
        .declare_schema(
            TypeSchema::new("Broken")
                .property("a", TypeKey::STRING)
                .property("a", TypeKey::NUMBER),
        )
        .expect_err("duplicate properties must be rejected");
    assert!(matches!(err, DataObjectError::InvalidSchema { .. }));
    assert!(!objects.has_properties(&TypeKey::new("Broken")));
}

#[test]
fn raw_property_lists_are_taken_as_given() {
    let mut objects = DataObjects::new();
    objects.set_properties(
        "Loose",
        vec![
            PropertyDescriptor::scalar("value", "Unregistered"),
            PropertyDescriptor::array("items", "Unregistered"),
        ],
    );

    // Element types without a handler are copied raw.
    let loose = objects
        .from_json(
            &TypeKey::new("Loose"),
            &json!({ "value": { "k": 1 }, "items": [1, "two", null] }),
        )
        .expect("loose should build");
    assert_eq!(loose.field("value"), &Value::from(json!({ "k": 1 })));
    assert_eq!(
        loose.field("items"),
        &Value::from(vec![Value::from(1), Value::from("two"), Value::Null])
    );

    let copy = objects.clone_value(&loose).expect("loose should clone");
    assert!(objects.equals(&copy, &loose).expect("values compare"));
}
