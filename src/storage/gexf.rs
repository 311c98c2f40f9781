//! GEXF export of coauthorship snapshots
//!
//! Writes GEXF 1.2 static undirected graphs with the full author attribute
//! set on nodes and co-publication counts as edge weights.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::graph::{AuthorNode, CoauthorGraph};

const NODE_ATTRIBUTES: [&str; 7] = [
    "display_name",
    "orcid",
    "country",
    "raw_author_name",
    "institution_id",
    "institution_display_name",
    "institution_country_code",
];

fn attribute_values(author: &AuthorNode) -> [&str; 7] {
    [
        &author.display_name,
        &author.orcid,
        &author.country,
        &author.raw_author_name,
        &author.institution_id,
        &author.institution_display_name,
        &author.institution_country_code,
    ]
}

/// Write one snapshot as a GEXF file
pub fn write_gexf(graph: &CoauthorGraph, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = Writer::new_with_indent(BufWriter::new(file), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut gexf = BytesStart::new("gexf");
    gexf.push_attribute(("xmlns", "http://www.gexf.net/1.2draft"));
    gexf.push_attribute(("version", "1.2"));
    writer.write_event(Event::Start(gexf))?;

    let mut graph_element = BytesStart::new("graph");
    graph_element.push_attribute(("mode", "static"));
    graph_element.push_attribute(("defaultedgetype", "undirected"));
    writer.write_event(Event::Start(graph_element))?;

    let mut attributes = BytesStart::new("attributes");
    attributes.push_attribute(("class", "node"));
    writer.write_event(Event::Start(attributes))?;
    for (attribute_id, title) in NODE_ATTRIBUTES.iter().enumerate() {
        let mut attribute = BytesStart::new("attribute");
        attribute.push_attribute(("id", attribute_id.to_string().as_str()));
        attribute.push_attribute(("title", *title));
        attribute.push_attribute(("type", "string"));
        writer.write_event(Event::Empty(attribute))?;
    }
    writer.write_event(Event::End(BytesEnd::new("attributes")))?;

    writer.write_event(Event::Start(BytesStart::new("nodes")))?;
    for node in graph.node_indices() {
        let author = graph.author(node);

        let mut node_element = BytesStart::new("node");
        node_element.push_attribute(("id", author.id.as_str()));
        let label = if author.display_name.is_empty() {
            author.id.as_str()
        } else {
            author.display_name.as_str()
        };
        node_element.push_attribute(("label", label));
        writer.write_event(Event::Start(node_element))?;

        writer.write_event(Event::Start(BytesStart::new("attvalues")))?;
        for (attribute_id, value) in attribute_values(author).iter().enumerate() {
            let mut attvalue = BytesStart::new("attvalue");
            attvalue.push_attribute(("for", attribute_id.to_string().as_str()));
            attvalue.push_attribute(("value", *value));
            writer.write_event(Event::Empty(attvalue))?;
        }
        writer.write_event(Event::End(BytesEnd::new("attvalues")))?;

        writer.write_event(Event::End(BytesEnd::new("node")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("nodes")))?;

    writer.write_event(Event::Start(BytesStart::new("edges")))?;
    for (edge_id, (source, target, weight)) in graph.edges().enumerate() {
        let mut edge = BytesStart::new("edge");
        edge.push_attribute(("id", edge_id.to_string().as_str()));
        edge.push_attribute(("source", graph.author(source).id.as_str()));
        edge.push_attribute(("target", graph.author(target).id.as_str()));
        edge.push_attribute(("weight", format!("{weight}.0").as_str()));
        writer.write_event(Event::Empty(edge))?;
    }
    writer.write_event(Event::End(BytesEnd::new("edges")))?;

    writer.write_event(Event::End(BytesEnd::new("graph")))?;
    writer.write_event(Event::End(BytesEnd::new("gexf")))?;

    log::info!(
        "GEXF graph with {} nodes and {} edges written to {}",
        graph.node_count(),
        graph.edge_count(),
        path.display()
    );
    Ok(())
}
