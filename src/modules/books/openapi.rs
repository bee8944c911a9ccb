use serde_json::{json, Value};

fn error_ref(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn book_ok(status_description: &str) -> Value {
    json!({
        "description": status_description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Book" }
            }
        }
    })
}

fn id_param() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "string" }
    })
}

fn user_header() -> Value {
    json!({
        "name": "x-user-id",
        "in": "header",
        "required": true,
        "description": "Authenticated caller",
        "schema": { "type": "string" }
    })
}

fn fields_body() -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/BookFields" }
            }
        }
    })
}

/// Paths and schemas served under `/api/books`
pub fn fragment() -> Value {
    json!({
        "paths": {
            "/": {
                "post": {
                    "summary": "Save a book, generating title and tags if left empty",
                    "tags": ["Books"],
                    "parameters": [user_header()],
                    "requestBody": fields_body(),
                    "responses": {
                        "201": book_ok("Saved book"),
                        "401": error_ref("Missing caller identity"),
                        "422": error_ref("Validation error")
                    }
                },
                "get": {
                    "summary": "List the caller's books, newest first",
                    "tags": ["Books"],
                    "parameters": [
                        user_header(),
                        {
                            "name": "keyword",
                            "in": "query",
                            "required": false,
                            "schema": { "type": "string" }
                        }
                    ],
                    "responses": {
                        "200": {
                            "description": "Matching books",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            }
                        },
                        "401": error_ref("Missing caller identity")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "parameters": [user_header(), id_param()],
                    "responses": {
                        "200": book_ok("The book"),
                        "404": error_ref("Book not found")
                    }
                },
                "put": {
                    "summary": "Replace every field of a book",
                    "tags": ["Books"],
                    "parameters": [user_header(), id_param()],
                    "requestBody": fields_body(),
                    "responses": {
                        "200": book_ok("Updated book"),
                        "404": error_ref("Book not found")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [user_header(), id_param()],
                    "responses": {
                        "204": { "description": "Deleted" },
                        "404": error_ref("Book not found")
                    }
                }
            },
            "/{id}/summary": {
                "get": {
                    "summary": "Summarize a book",
                    "tags": ["Books"],
                    "parameters": [user_header(), id_param()],
                    "responses": {
                        "200": {
                            "description": "Summary",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookSummary" }
                                }
                            }
                        },
                        "404": error_ref("Book not found")
                    }
                }
            },
            "/merge": {
                "post": {
                    "summary": "Merge two or more books into a new one",
                    "tags": ["Books"],
                    "parameters": [user_header()],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/MergeBooks" }
                            }
                        }
                    },
                    "responses": {
                        "201": book_ok("Merged book"),
                        "404": error_ref("A source book was not found"),
                        "422": error_ref("Validation error")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": { "description": "OK" }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "user_id": { "type": "string" },
                        "title": { "type": "string" },
                        "author": { "type": ["string", "null"] },
                        "description": { "type": ["string", "null"] },
                        "url": { "type": ["string", "null"] },
                        "content": { "type": "string" },
                        "tags": { "type": "array", "items": { "type": "string" } },
                        "created_at": { "type": "string", "format": "date-time" },
                        "updated_at": { "type": "string", "format": "date-time" }
                    },
                    "required": ["id", "user_id", "title", "content", "tags", "created_at", "updated_at"]
                },
                "BookFields": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "author": { "type": ["string", "null"] },
                        "description": { "type": ["string", "null"] },
                        "url": { "type": ["string", "null"] },
                        "content": { "type": "string" },
                        "tags": { "type": "array", "items": { "type": "string" } }
                    },
                    "required": ["content"]
                },
                "MergeBooks": {
                    "type": "object",
                    "properties": {
                        "book_ids": { "type": "array", "items": { "type": "string" }, "minItems": 2 }
                    },
                    "required": ["book_ids"]
                },
                "BookSummary": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "summary": { "type": "string" }
                    },
                    "required": ["id", "summary"]
                }
            }
        }
    })
}
