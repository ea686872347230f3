//! 絞り込みUIが提示する選択肢の定義
//!
//! 職種・スキル・働き方・金額帯の選択肢をプロセス起動時に一度だけ構築する
//! 不変のカタログとして持つ。述語コンパイラとUI層の双方がここを参照し、
//! 呼び出し側ごとの再宣言はしない。

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::WorkStyle;
use crate::filter::FacetKind;

#[derive(Debug, Clone, Copy)]
pub struct RoleOption {
    pub label: &'static str,
    pub slug: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct RoleGroup {
    pub name: &'static str,
    pub items: &'static [RoleOption],
}

#[derive(Debug, Clone, Copy)]
pub struct SkillGroup {
    pub name: &'static str,
    pub items: &'static [&'static str],
}

/// 金額セレクタの選択肢（円）
#[derive(Debug, Clone, Copy)]
pub struct PriceOption {
    pub label: &'static str,
    pub value: i64,
}

/// ワンクリックで絞り込みを切り替える人気タグ
#[derive(Debug, Clone, Copy)]
pub struct QuickTag {
    pub label: &'static str,
    pub facet: FacetKind,
    pub value: &'static str,
}

#[derive(Debug)]
pub struct FilterCatalog {
    pub role_groups: &'static [RoleGroup],
    pub skill_groups: &'static [SkillGroup],
    pub work_styles: &'static [(&'static str, WorkStyle)],
    pub price_options: &'static [PriceOption],
    pub popular_tags: &'static [QuickTag],
}

const fn role(label: &'static str, slug: &'static str) -> RoleOption {
    RoleOption { label, slug }
}

static ROLE_GROUPS: &[RoleGroup] = &[
    RoleGroup {
        name: "エンジニア",
        items: &[
            role("フロントエンドエンジニア", "frontend-engineer"),
            role("バックエンドエンジニア", "backend-engineer"),
            role("サーバーサイドエンジニア", "server-side-engineer"),
            role("アプリエンジニア", "mobile-app-engineer"),
            role("インフラエンジニア", "infrastructure-engineer"),
            role("ネットワークエンジニア", "network-engineer"),
            role("データベースエンジニア", "database-engineer"),
            role("セキュリティエンジニア", "security-engineer"),
            role("情報システム", "information-systems"),
            role("社内SE", "internal-se"),
            role("汎用機エンジニア", "mainframe-engineer"),
            role("AIエンジニア", "ai-engineer"),
            role("機械学習エンジニア", "ml-engineer"),
            role("ブロックチェーンエンジニア", "blockchain-engineer"),
            role("テクニカルサポート", "technical-support"),
            role("組込・制御エンジニア", "embedded-engineer"),
            role("システムエンジニア(SE)", "system-engineer"),
            role("プログラマー(PG)", "programmer"),
            role("SRE", "sre"),
            role("クラウドエンジニア", "cloud-engineer"),
            role("VPoE", "vpoe"),
            role("エンジニアリングマネージャー", "engineering-manager"),
            role("コーダー", "coder"),
            role("CRE", "cre"),
            role("データサイエンティスト", "data-scientist"),
            role("DBA", "dba"),
            role("QAエンジニア", "qa-engineer"),
            role("デバッガー", "debugger"),
            role("テスター", "tester"),
            role("ブリッジSE", "bridge-se"),
            role("フルスタックエンジニア", "fullstack-engineer"),
            role("ヘルプデスク", "helpdesk"),
        ],
    },
    RoleGroup {
        name: "デザイナー",
        items: &[
            role("Webデザイナー", "web-designer"),
            role("イラストレーター", "illustrator"),
            role("UI・UXデザイナー", "ui-ux-designer"),
            role("グラフィックデザイナー", "graphic-designer"),
            role("キャラクターデザイナー", "character-designer"),
            role("2Dデザイナー", "2d-designer"),
            role("3Dデザイナー", "3d-designer"),
            role("アートディレクター", "art-director"),
            role("エフェクトデザイナー", "effect-designer"),
            role("アニメーター", "animator"),
        ],
    },
    RoleGroup {
        name: "マーケター",
        items: &[
            role("Webマーケター", "web-marketer"),
            role("デジタルマーケター", "digital-marketer"),
        ],
    },
    RoleGroup {
        name: "クリエイター",
        items: &[
            role("プランナー", "planner"),
            role("動画・映像制作", "video-creator"),
            role("3Dモデラー", "3d-modeler"),
            role("ライター", "writer"),
            role("シナリオライター", "scenario-writer"),
            role("ゲームプランナー", "game-planner"),
        ],
    },
    RoleGroup {
        name: "PM・ディレクター",
        items: &[
            role("プロジェクトマネージャー", "pm"),
            role("PMO", "pmo"),
            role("プロダクトマネージャー(PdM)", "pdm"),
            role("Webディレクター", "web-director"),
            role("プロデューサー", "producer"),
            role("ゲームディレクター", "game-director"),
            role("動画ディレクター", "video-director"),
        ],
    },
    RoleGroup {
        name: "コンサルタント",
        items: &[
            role("ITコンサルタント", "it-consultant"),
            role("SAPコンサルタント", "sap-consultant"),
            role("ITアーキテクト", "it-architect"),
            role("戦略系コンサルタント", "strategy-consultant"),
        ],
    },
];

static SKILL_GROUPS: &[SkillGroup] = &[
    SkillGroup {
        name: "開発言語",
        items: &[
            "Java", "PHP", "Python", "Ruby", "Go言語", "Scala", "Perl", "JavaScript", "HTML5",
            "Swift", "Objective-C", "Kotlin", "Unity", "Cocos2d-x", "C言語", "C#", "C++", "VC++",
            "C#.NET", "VB.NET", "VB", "VBA", "SQL", "PL/SQL", "R言語", "COBOL", "JSON", "Shell",
            "Apex", "VBScript", "LISP", "Haskell", "Lua", "XAML", "Transact-SQL", "ActionScript",
            "CoffeeScript", "ASP.NET", "RPG", "JSP", "CSS3", "JCL", "UML", "ABAP", "Sass", "LESS",
            "TypeScript", "Rust", "Dart",
        ],
    },
    SkillGroup {
        name: "フレームワーク",
        items: &[
            "Node.js", "CakePHP", "Ruby on Rails", "Spring", "Django", "FuelPHP", "Struts",
            "Catalyst", "Spark", "JSF", "JUnit", "CodeIgniter", "MyBatis", "Sinatra", "iBATIS",
            "Symfony", "Zend Framework", "Flask", "Wicket", "jQuery", "Seasar2", "Backbone.js",
            "Knockout.js", "AngularJS", "Laravel", "SAStruts", "MVC", "intra-mart", "React",
            "Vue.js", "Bootstrap", "Phalcon", "ReactNative", "SpringBoot", "PlayFramework",
            "Slim", "Yii", "Tornado", "Flutter", "NuxtJS", "Tensorflow", "Pytorch", "Next.js",
            "Angular",
        ],
    },
    SkillGroup {
        name: "インフラ・ミドルウェア",
        items: &[
            "AWS", "Linux", "WindowsServer", "UNIX", "Microsoft Azure", "Android", "Access",
            "Oracle", "Heroku", "Google Cloud Platform(GCP)", "ColdFusion", "Firebase",
            "Terraform", "AWS CloudFormation", "Kubernetes", "Cisco", "Exchange",
        ],
    },
    SkillGroup {
        name: "その他ツール",
        items: &[
            "Photoshop", "Illustrator", "SAP", "Sketch", "Salesforce", "JP1", "WordPress",
            "SharePoint", "Hadoop", "Zabbix", "Tableau", "Delphi", "Figma", "SAS", "Adobe XD",
            "CircleCI", "Datadog", "kintone", "Maya", "After Effects", "Active Directory",
            "ファイヤーウォール", "Company", "Adobe Premiere", "Flash", "Blender", "3ds Max",
        ],
    },
];

static WORK_STYLES: &[(&str, WorkStyle)] = &[
    ("フルリモート", WorkStyle::Remote),
    ("リモート可（週1〜）", WorkStyle::Hybrid),
    ("常駐", WorkStyle::Onsite),
];

static PRICE_OPTIONS: &[PriceOption] = &[
    PriceOption { label: "30万円", value: 300_000 },
    PriceOption { label: "40万円", value: 400_000 },
    PriceOption { label: "50万円", value: 500_000 },
    PriceOption { label: "60万円", value: 600_000 },
    PriceOption { label: "70万円", value: 700_000 },
    PriceOption { label: "80万円", value: 800_000 },
    PriceOption { label: "90万円", value: 900_000 },
    PriceOption { label: "100万円", value: 1_000_000 },
    PriceOption { label: "120万円", value: 1_200_000 },
    PriceOption { label: "150万円", value: 1_500_000 },
    PriceOption { label: "200万円", value: 2_000_000 },
];

static POPULAR_TAGS: &[QuickTag] = &[
    QuickTag { label: "React", facet: FacetKind::Skill, value: "React" },
    QuickTag { label: "Next.js", facet: FacetKind::Skill, value: "Next.js" },
    QuickTag { label: "TypeScript", facet: FacetKind::Skill, value: "TypeScript" },
    QuickTag { label: "Python", facet: FacetKind::Skill, value: "Python" },
    QuickTag { label: "Go", facet: FacetKind::Skill, value: "Go言語" },
    QuickTag { label: "AWS", facet: FacetKind::Skill, value: "AWS" },
    QuickTag { label: "PM", facet: FacetKind::Role, value: "pm" },
    QuickTag { label: "フルリモート", facet: FacetKind::WorkStyle, value: "remote" },
];

static CATALOG: FilterCatalog = FilterCatalog {
    role_groups: ROLE_GROUPS,
    skill_groups: SKILL_GROUPS,
    work_styles: WORK_STYLES,
    price_options: PRICE_OPTIONS,
    popular_tags: POPULAR_TAGS,
};

static ROLE_LABELS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for group in ROLE_GROUPS {
        for item in group.items {
            map.insert(item.slug, item.label);
        }
    }
    map
});

pub fn catalog() -> &'static FilterCatalog {
    &CATALOG
}

impl FilterCatalog {
    /// 職種スラッグから表示ラベルを引く（O(1)）
    pub fn role_label(&self, slug: &str) -> Option<&'static str> {
        ROLE_LABELS.get(slug).copied()
    }

    pub fn work_style_label(&self, style: WorkStyle) -> Option<&'static str> {
        self.work_styles
            .iter()
            .find(|(_, s)| *s == style)
            .map(|(label, _)| *label)
    }

    pub fn known_skill(&self, name: &str) -> bool {
        self.skill_groups
            .iter()
            .any(|group| group.items.contains(&name))
    }
}
