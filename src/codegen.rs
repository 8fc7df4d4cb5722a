//! Java source generation: JPA entity classes and Spring Data repositories.
//!
//! Both generators are total. A relationship whose target table cannot be
//! found is left out of the output.

use crate::model::{Cardinality, Constraint, Field, Relationship, Table};
use crate::naming::{camel_case, capitalize_first_letter};

/// Generate one entity class per table, in table order.
pub fn generate_entities(tables: &[Table], relationships: &[Relationship]) -> String {
    let mut output = String::new();

    for table in tables {
        output.push_str("import javax.persistence.*;\n");
        output.push_str("import lombok.*;\n");
        output.push_str("import java.util.*;\n\n");

        output.push_str("@Entity\n");
        output.push_str(&format!("@Table(name = \"{}\")\n", table.name.to_lowercase()));
        output.push_str("@Data\n");
        output.push_str("@NoArgsConstructor\n");
        output.push_str("@AllArgsConstructor\n");
        output.push_str("@Builder\n");
        output.push_str(&format!(
            "public class {} {{\n\n",
            capitalize_first_letter(&table.name)
        ));

        for field in &table.fields {
            write_field(&mut output, field);
        }

        for rel in relationships.iter().filter(|r| r.source == table.id) {
            match tables.iter().find(|t| t.id == rel.target) {
                Some(target) => write_relationship(&mut output, table, target, rel.kind),
                None => {
                    tracing::trace!(
                        relationship = %rel.id,
                        target = %rel.target,
                        "skipping relationship with unresolved target"
                    );
                }
            }
        }

        output.push_str("}\n\n");
    }

    output
}

/// Generate one repository interface per table, in table order.
pub fn generate_repositories(tables: &[Table]) -> String {
    let mut output = String::new();

    for table in tables {
        let class_name = capitalize_first_letter(&table.name);

        output.push_str("import org.springframework.data.jpa.repository.JpaRepository;\n");
        output.push_str("import org.springframework.stereotype.Repository;\n\n");

        output.push_str("@Repository\n");
        output.push_str(&format!(
            "public interface {0}Repository extends JpaRepository<{0}, Long> {{\n",
            class_name
        ));
        output.push_str("    // Add custom query methods here\n");
        output.push_str("}\n\n");
    }

    output
}

fn write_field(output: &mut String, field: &Field) {
    if field.is_primary {
        output.push_str("    @Id\n");
        output.push_str("    @GeneratedValue(strategy = GenerationType.IDENTITY)\n");
    }

    for constraint in &field.constraints {
        match constraint {
            Constraint::NotNull => output.push_str("    @Column(nullable = false)\n"),
            Constraint::Unique => output.push_str("    @Column(unique = true)\n"),
        }
    }

    output.push_str(&format!("    private {} {};\n\n", field.typ, field.name));
}

fn write_relationship(output: &mut String, table: &Table, target: &Table, kind: Cardinality) {
    let target_class = capitalize_first_letter(&target.name);
    let target_var = camel_case(&target.name);

    match kind {
        Cardinality::OneToMany => {
            output.push_str(&format!(
                "    @OneToMany(mappedBy = \"{}\", cascade = CascadeType.ALL)\n",
                camel_case(&table.name)
            ));
            output.push_str(&format!(
                "    private List<{}> {}List;\n\n",
                target_class, target_var
            ));
        }
        Cardinality::ManyToOne => {
            output.push_str("    @ManyToOne\n");
            output.push_str(&format!("    @JoinColumn(name = \"{}_id\")\n", target_var));
            output.push_str(&format!("    private {} {};\n\n", target_class, target_var));
        }
        Cardinality::OneToOne => {
            output.push_str("    @OneToOne(cascade = CascadeType.ALL)\n");
            output.push_str(&format!("    @JoinColumn(name = \"{}_id\")\n", target_var));
            output.push_str(&format!("    private {} {};\n\n", target_class, target_var));
        }
        Cardinality::ManyToMany => {
            let source_lower = table.name.to_lowercase();
            let target_lower = target.name.to_lowercase();

            output.push_str("    @ManyToMany\n");
            output.push_str("    @JoinTable(\n");
            output.push_str(&format!(
                "        name = \"{}_{}\",\n",
                source_lower, target_lower
            ));
            output.push_str(&format!(
                "        joinColumns = @JoinColumn(name = \"{}_id\"),\n",
                source_lower
            ));
            output.push_str(&format!(
                "        inverseJoinColumns = @JoinColumn(name = \"{}_id\")\n",
                target_lower
            ));
            output.push_str("    )\n");
            output.push_str(&format!(
                "    private List<{}> {}List;\n\n",
                target_class, target_var
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldType, Position, RelationshipId, TableId};

    fn table(id: u32, name: &str, fields: Vec<Field>) -> Table {
        Table {
            id: TableId(id),
            name: name.to_string(),
            fields,
            position: Position::default(),
        }
    }

    fn id_field() -> Field {
        Field::new("id", FieldType::Long)
            .primary()
            .with_constraint(Constraint::NotNull)
    }

    fn rel(id: u32, source: u32, target: u32, kind: Cardinality) -> Relationship {
        Relationship {
            id: RelationshipId(id),
            source: TableId(source),
            source_field: "id".to_string(),
            target: TableId(target),
            target_field: "ref_id".to_string(),
            kind,
        }
    }

    fn user_and_post() -> Vec<Table> {
        vec![
            table(
                1,
                "User",
                vec![
                    id_field(),
                    Field::new("email", FieldType::String).with_constraint(Constraint::Unique),
                ],
            ),
            table(2, "Post", vec![id_field(), Field::new("title", FieldType::String)]),
        ]
    }

    #[test]
    fn test_user_post_one_to_many() {
        let tables = user_and_post();
        let relationships = vec![Relationship {
            target_field: "user_id".to_string(),
            ..rel(3, 1, 2, Cardinality::OneToMany)
        }];

        let code = generate_entities(&tables, &relationships);

        let expected = "\
import javax.persistence.*;
import lombok.*;
import java.util.*;

@Entity
@Table(name = \"user\")
@Data
@NoArgsConstructor
@AllArgsConstructor
@Builder
public class User {

    @Id
    @GeneratedValue(strategy = GenerationType.IDENTITY)
    @Column(nullable = false)
    private Long id;

    @Column(unique = true)
    private String email;

    @OneToMany(mappedBy = \"user\", cascade = CascadeType.ALL)
    private List<Post> postList;

}

import javax.persistence.*;
import lombok.*;
import java.util.*;

@Entity
@Table(name = \"post\")
@Data
@NoArgsConstructor
@AllArgsConstructor
@Builder
public class Post {

    @Id
    @GeneratedValue(strategy = GenerationType.IDENTITY)
    @Column(nullable = false)
    private Long id;

    private String title;

}

";
        assert_eq!(code, expected);
    }

    #[test]
    fn test_deterministic() {
        let tables = user_and_post();
        let relationships = vec![rel(3, 1, 2, Cardinality::ManyToMany)];
        assert_eq!(
            generate_entities(&tables, &relationships),
            generate_entities(&tables, &relationships)
        );
    }

    #[test]
    fn test_many_to_one_and_one_to_one() {
        let tables = vec![
            table(1, "order_line", vec![id_field()]),
            table(2, "purchase_order", vec![id_field()]),
            table(3, "Invoice", vec![id_field()]),
        ];
        let relationships = vec![
            rel(4, 1, 2, Cardinality::ManyToOne),
            rel(5, 1, 3, Cardinality::OneToOne),
        ];

        let code = generate_entities(&tables, &relationships);

        assert!(code.contains("public class Order_line {"));
        assert!(code.contains(
            "    @ManyToOne\n    @JoinColumn(name = \"purchaseOrder_id\")\n    private Purchase_order purchaseOrder;\n\n"
        ));
        assert!(code.contains(
            "    @OneToOne(cascade = CascadeType.ALL)\n    @JoinColumn(name = \"invoice_id\")\n    private Invoice invoice;\n\n"
        ));
    }

    #[test]
    fn test_many_to_many_join_table() {
        let tables = vec![
            table(1, "Student", vec![id_field()]),
            table(2, "Course", vec![id_field()]),
        ];
        let code = generate_entities(&tables, &[rel(3, 1, 2, Cardinality::ManyToMany)]);

        let expected = "    @ManyToMany
    @JoinTable(
        name = \"student_course\",
        joinColumns = @JoinColumn(name = \"student_id\"),
        inverseJoinColumns = @JoinColumn(name = \"course_id\")
    )
    private List<Course> courseList;

}
";
        assert!(code.contains(expected));
    }

    #[test]
    fn test_unresolved_target_skipped() {
        let tables = vec![table(1, "User", vec![id_field()])];
        let with_dangling = generate_entities(&tables, &[rel(2, 1, 99, Cardinality::OneToMany)]);
        assert_eq!(with_dangling, generate_entities(&tables, &[]));
    }

    #[test]
    fn test_relationships_in_stored_order() {
        let tables = vec![
            table(1, "A", vec![id_field()]),
            table(2, "B", vec![id_field()]),
            table(3, "C", vec![id_field()]),
        ];
        let relationships = vec![
            rel(4, 1, 3, Cardinality::ManyToOne),
            rel(5, 1, 2, Cardinality::ManyToOne),
        ];
        let code = generate_entities(&tables, &relationships);

        let c = code.find("private C c;").unwrap();
        let b = code.find("private B b;").unwrap();
        assert!(c < b);
    }

    #[test]
    fn test_repositories() {
        let code = generate_repositories(&user_and_post());

        let expected = "\
import org.springframework.data.jpa.repository.JpaRepository;
import org.springframework.stereotype.Repository;

@Repository
public interface UserRepository extends JpaRepository<User, Long> {
    // Add custom query methods here
}

import org.springframework.data.jpa.repository.JpaRepository;
import org.springframework.stereotype.Repository;

@Repository
public interface PostRepository extends JpaRepository<Post, Long> {
    // Add custom query methods here
}

";
        assert_eq!(code, expected);
        assert_eq!(code.matches("public interface").count(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(generate_entities(&[], &[]), "");
        assert_eq!(generate_repositories(&[]), "");
    }
}
